use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::error::{ResolveError, TransformError};
use crate::ir::*;
use crate::parse::media_type::MediaType;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::ref_resolve::RefResolver;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiSpec;

use super::name_normalizer::{normalize_name, synthesize_operation_id, to_field_name};
use super::type_mapper::TypeMapper;

/// Default module path that component schema references are qualified with.
pub const DEFAULT_MODEL_NAMESPACE: &str = "crate::client::models";

/// Options controlling how the transform phase resolves types and references.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Module path prefixed to every component schema reference.
    pub model_namespace: String,
    /// Fail on schema references whose target is not declared. When off, the
    /// reference is still emitted by name and a warning is logged.
    pub strict_refs: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            model_namespace: DEFAULT_MODEL_NAMESPACE.to_string(),
            strict_refs: true,
        }
    }
}

/// Transform a parsed OpenAPI spec into the fully resolved IR.
pub fn transform(spec: &OpenApiSpec) -> Result<IrSpec, TransformError> {
    transform_with_options(spec, &TransformOptions::default())
}

/// Transform with explicit options.
pub fn transform_with_options(
    spec: &OpenApiSpec,
    options: &TransformOptions,
) -> Result<IrSpec, TransformError> {
    let ctx = Context {
        resolver: RefResolver::new(spec),
        mapper: TypeMapper::new(spec, options.model_namespace.as_str()),
        strict_refs: options.strict_refs,
    };

    // Phase 1: Component schemas become models
    let models = ctx.resolve_models()?;

    // Phase 2: Operations, path by path
    let operations = ctx.resolve_operations(spec)?;

    // Phase 3: IR info
    let info = IrInfo {
        title: spec.info.title.clone(),
        description: spec.info.description.clone(),
        version: spec.info.version.clone(),
    };

    Ok(IrSpec {
        info,
        operations,
        models,
    })
}

struct Context<'a> {
    resolver: RefResolver<'a>,
    mapper: TypeMapper<'a>,
    strict_refs: bool,
}

impl Context<'_> {
    /// Check the schema references reachable from `schema`.
    fn check_refs(&self, schema: Option<&SchemaOrRef>) -> Result<(), TransformError> {
        let Some(schema) = schema else {
            return Ok(());
        };
        match self.resolver.validate_schema_refs(schema) {
            Ok(()) => Ok(()),
            Err(err) if self.strict_refs => Err(err.into()),
            Err(ResolveError::RefTargetNotFound(target)) => {
                warn!("dangling schema reference {target}, emitting it by name");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn resolve_models(&self) -> Result<Vec<IrModel>, TransformError> {
        let mut models = Vec::new();
        for (name, schema_or_ref) in self.mapper.schemas() {
            self.check_refs(Some(schema_or_ref))?;

            let model = match schema_or_ref {
                SchemaOrRef::Schema(schema) => IrModel {
                    name: normalize_name(name),
                    description: schema.description.clone(),
                    fields: schema
                        .properties
                        .iter()
                        .map(|(prop_name, prop)| {
                            let required = schema.required.contains(prop_name);
                            IrField {
                                original_name: prop_name.clone(),
                                field_name: to_field_name(prop_name),
                                field_type: self.mapper.resolve_field(Some(prop), required),
                                required,
                                description: property_description(prop),
                            }
                        })
                        .collect(),
                },
                // A component that is itself a reference is an alias with no fields.
                SchemaOrRef::Ref { .. } => IrModel {
                    name: normalize_name(name),
                    description: None,
                    fields: Vec::new(),
                },
            };

            debug!("model {} with {} fields", model.name, model.fields.len());
            models.push(model);
        }
        Ok(models)
    }

    fn resolve_operations(&self, spec: &OpenApiSpec) -> Result<Vec<IrOperation>, TransformError> {
        let mut operations = Vec::new();

        for (path, path_item) in &spec.paths {
            let path_params = self.resolve_parameters(&path_item.parameters)?;
            self.collect_operations(path, path_item, &path_params, &mut operations)?;
        }

        dedupe_operation_names(&mut operations);
        Ok(operations)
    }

    fn collect_operations(
        &self,
        path: &str,
        item: &PathItem,
        path_params: &[IrParameter],
        out: &mut Vec<IrOperation>,
    ) -> Result<(), TransformError> {
        macro_rules! add_op {
            ($method:expr, $op:expr) => {
                if let Some(ref op) = $op {
                    let ir_op = self.build_operation($method, path, op, path_params)?;
                    out.push(ir_op);
                }
            };
        }

        add_op!(HttpMethod::Get, item.get);
        add_op!(HttpMethod::Post, item.post);
        add_op!(HttpMethod::Put, item.put);
        add_op!(HttpMethod::Delete, item.delete);
        add_op!(HttpMethod::Patch, item.patch);

        Ok(())
    }

    fn build_operation(
        &self,
        method: HttpMethod,
        path: &str,
        op: &Operation,
        path_params: &[IrParameter],
    ) -> Result<IrOperation, TransformError> {
        let raw_name = op
            .operation_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| synthesize_operation_id(method.as_str(), path));

        let mut parameters = path_params.to_vec();
        for param in self.resolve_parameters(&op.parameters)? {
            match parameters
                .iter_mut()
                .find(|p| p.original_name == param.original_name && p.location == param.location)
            {
                Some(existing) => *existing = param,
                None => parameters.push(param),
            }
        }

        let request_body = match &op.request_body {
            Some(body) => {
                let body = self.resolver.resolve_request_body(body)?;
                Some(IrRequestBody {
                    description: body.description.clone(),
                    required: body.required,
                    content: self.resolve_content(&body.content)?,
                })
            }
            None => None,
        };

        let response = self.select_response(op)?;

        let idempotent = method.is_idempotent();
        let operation = IrOperation {
            name: normalize_name(&raw_name),
            method,
            path: path.to_string(),
            summary: op.summary.clone(),
            description: op.description.clone(),
            tags: op.tags.clone(),
            parameters,
            request_body,
            response,
            idempotent,
            retry_policy: RetryPolicy::for_idempotency(idempotent),
            deprecated: op.deprecated.unwrap_or(false),
        };

        debug!(
            "operation {} ({} {}): {} parameters, body: {}, request object: {}",
            operation.name,
            method.as_str(),
            path,
            operation.parameters.len(),
            operation.request_body.is_some(),
            operation.uses_request_object()
        );

        Ok(operation)
    }

    fn resolve_parameters(
        &self,
        params: &[ParameterOrRef],
    ) -> Result<Vec<IrParameter>, TransformError> {
        params
            .iter()
            .map(|p| {
                let param = self.resolver.resolve_parameter(p)?;
                self.build_parameter(&param)
            })
            .collect()
    }

    fn build_parameter(&self, param: &Parameter) -> Result<IrParameter, TransformError> {
        self.check_refs(param.schema.as_ref())?;
        Ok(IrParameter {
            original_name: param.name.clone(),
            field_name: to_field_name(&param.name),
            location: ir_location(param.location),
            param_type: self
                .mapper
                .resolve_field(param.schema.as_ref(), param.required),
            required: param.required,
            description: param.description.clone(),
        })
    }

    /// The first 2xx response in document order, else the first declared
    /// response, else a synthesized `200` with no body.
    fn select_response(&self, op: &Operation) -> Result<IrResponse, TransformError> {
        let selected = op
            .responses
            .iter()
            .find(|(code, _)| code.starts_with('2'))
            .or_else(|| op.responses.first());

        let Some((status_code, response)) = selected else {
            return Ok(IrResponse {
                status_code: "200".to_string(),
                description: Some("Success".to_string()),
                content: IndexMap::new(),
            });
        };

        let response = self.resolver.resolve_response(response)?;
        Ok(IrResponse {
            status_code: status_code.clone(),
            description: Some(response.description.clone()).filter(|d| !d.is_empty()),
            content: self.resolve_content(&response.content)?,
        })
    }

    fn resolve_content(
        &self,
        content: &IndexMap<String, MediaType>,
    ) -> Result<IndexMap<String, IrMediaType>, TransformError> {
        let mut resolved = IndexMap::with_capacity(content.len());
        for (content_type, media) in content {
            self.check_refs(media.schema.as_ref())?;

            let media_type = self.mapper.resolve(media.schema.as_ref());
            let item_type = match &media_type {
                IrType::Array(inner) => Some(inner.as_ref().clone()),
                _ => None,
            };
            let schema_ref = match &media.schema {
                Some(SchemaOrRef::Ref { ref_path }) => Some(ref_path.clone()),
                _ => None,
            };

            resolved.insert(
                content_type.clone(),
                IrMediaType {
                    content_type: content_type.clone(),
                    is_array: item_type.is_some(),
                    media_type,
                    item_type,
                    schema_ref,
                },
            );
        }
        Ok(resolved)
    }
}

fn ir_location(location: ParameterLocation) -> IrParameterLocation {
    match location {
        ParameterLocation::Path => IrParameterLocation::Path,
        ParameterLocation::Query => IrParameterLocation::Query,
        ParameterLocation::Header => IrParameterLocation::Header,
        ParameterLocation::Cookie => IrParameterLocation::Cookie,
    }
}

fn property_description(prop: &SchemaOrRef) -> Option<String> {
    match prop {
        SchemaOrRef::Schema(schema) => schema.description.clone(),
        SchemaOrRef::Ref { .. } => None,
    }
}

/// Rename operations whose snake_case name is already taken.
///
/// Ids equal after case folding (`getPet`, `get_pet`) would produce the same
/// generated items, so later ones get the first free `_2`, `_3`, ... suffix
/// in document order.
fn dedupe_operation_names(operations: &mut [IrOperation]) {
    let mut taken = HashSet::new();
    for op in operations.iter_mut() {
        if taken.insert(op.name.snake_case.clone()) {
            continue;
        }

        let mut suffix = 2;
        let renamed = loop {
            let candidate = normalize_name(&format!("{}_{suffix}", op.name.original));
            if !taken.contains(&candidate.snake_case) {
                break candidate;
            }
            suffix += 1;
        };
        warn!(
            "duplicate operation id `{}` ({} {}), renamed to `{}`",
            op.name,
            op.method.as_str(),
            op.path,
            renamed.original
        );
        taken.insert(renamed.snake_case.clone());
        op.name = renamed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_path_level_parameter_is_overridden() {
        let spec = parse::from_yaml(
            r#"
openapi: "3.0.3"
info:
  title: Merge
  version: "1"
paths:
  /pets/{id}:
    parameters:
      - name: id
        in: path
        required: true
        schema:
          type: string
      - name: trace
        in: header
        schema:
          type: string
    get:
      operationId: getPet
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
            format: int64
      responses:
        "200":
          description: ok
"#,
        )
        .unwrap();

        let ir = transform(&spec).unwrap();
        let params = &ir.operations[0].parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].original_name, "id");
        assert_eq!(params[0].param_type, IrType::Int64);
        assert_eq!(params[1].original_name, "trace");
        assert_eq!(
            params[1].param_type,
            IrType::Nullable(Box::new(IrType::String))
        );
    }

    #[test]
    fn test_response_selection() {
        let spec = parse::from_yaml(
            r#"
openapi: "3.0.3"
info:
  title: Responses
  version: "1"
paths:
  /a:
    get:
      responses:
        "404":
          description: missing
        "201":
          description: created
          content:
            text/plain:
              schema:
                type: string
  /b:
    get:
      responses:
        default:
          description: anything
  /c:
    get: {}
"#,
        )
        .unwrap();

        let ir = transform(&spec).unwrap();
        assert_eq!(ir.operations[0].response.status_code, "201");
        assert_eq!(ir.operations[0].return_type(), Some(&IrType::String));
        assert_eq!(ir.operations[1].response.status_code, "default");
        assert_eq!(ir.operations[1].return_type(), None);
        assert_eq!(ir.operations[2].response.status_code, "200");
        assert_eq!(
            ir.operations[2].response.description.as_deref(),
            Some("Success")
        );
    }

    #[test]
    fn test_dangling_ref_strict_and_lenient() {
        let spec = parse::from_yaml(
            r##"
openapi: "3.0.3"
info:
  title: Dangling
  version: "1"
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Missing"
"##,
        )
        .unwrap();

        assert!(matches!(
            transform(&spec),
            Err(TransformError::Resolve(ResolveError::RefTargetNotFound(_)))
        ));

        let lenient = TransformOptions {
            strict_refs: false,
            ..TransformOptions::default()
        };
        let ir = transform_with_options(&spec, &lenient).unwrap();
        let media = ir.operations[0].response.primary().unwrap();
        assert!(media.is_array);
        assert_eq!(
            media.item_type.as_ref().and_then(IrType::qualified_name).as_deref(),
            Some("crate::client::models::Missing")
        );
    }

    #[test]
    fn test_colliding_operation_ids_are_suffixed() {
        let spec = parse::from_yaml(
            r#"
openapi: "3.0.3"
info:
  title: Collisions
  version: "1"
paths:
  /a:
    get:
      operationId: getPet
  /b:
    get:
      operationId: get_pet
  /c:
    get:
      operationId: getPet
"#,
        )
        .unwrap();

        let ir = transform(&spec).unwrap();
        let names: Vec<(&str, &str)> = ir
            .operations
            .iter()
            .map(|op| (op.name.original.as_str(), op.name.screaming_snake.as_str()))
            .collect();
        assert_eq!(
            names,
            [
                ("getPet", "GET_PET"),
                ("get_pet_2", "GET_PET_2"),
                ("getPet_3", "GET_PET_3"),
            ]
        );
    }
}
