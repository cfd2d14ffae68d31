use indexmap::IndexMap;
use log::debug;

use crate::ir::IrType;
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, TypeSet};
use crate::parse::spec::OpenApiSpec;

use super::name_normalizer::normalize_name;

/// Maps schema descriptors to output types.
///
/// Owns the component-schema registry and the model namespace that named
/// references are qualified with, so every `$ref` to the same schema resolves
/// to the same [`IrType::Ref`].
#[derive(Debug, Clone)]
pub struct TypeMapper<'a> {
    schemas: Option<&'a IndexMap<String, SchemaOrRef>>,
    model_namespace: String,
}

impl<'a> TypeMapper<'a> {
    pub fn new(spec: &'a OpenApiSpec, model_namespace: impl Into<String>) -> Self {
        Self {
            schemas: spec.components.as_ref().map(|c| &c.schemas),
            model_namespace: model_namespace.into(),
        }
    }

    /// Component schemas in declared order.
    pub fn schemas(&self) -> impl Iterator<Item = (&'a String, &'a SchemaOrRef)> {
        self.schemas.into_iter().flat_map(IndexMap::iter)
    }

    pub fn model_namespace(&self) -> &str {
        &self.model_namespace
    }

    /// Resolve a descriptor to its output type. An absent descriptor is untyped.
    pub fn resolve(&self, schema: Option<&SchemaOrRef>) -> IrType {
        match schema {
            None => IrType::Any,
            Some(SchemaOrRef::Ref { ref_path }) => self.resolve_ref(ref_path),
            Some(SchemaOrRef::Schema(schema)) => self.resolve_schema(schema),
        }
    }

    /// Resolve a struct member or parameter type; optional values become nullable.
    pub fn resolve_field(&self, schema: Option<&SchemaOrRef>, required: bool) -> IrType {
        let resolved = self.resolve(schema);
        if required || resolved.is_nullable() {
            resolved
        } else {
            IrType::Nullable(Box::new(resolved))
        }
    }

    /// `#/components/schemas/pet-status` → `<model namespace>::PetStatus`.
    ///
    /// The final path segment is PascalCased the same way model names are; the
    /// target is not inlined, so self-referential schemas resolve like any
    /// other name.
    pub fn resolve_ref(&self, ref_path: &str) -> IrType {
        let key = ref_path.rsplit('/').next().unwrap_or(ref_path);
        IrType::Ref {
            namespace: self.model_namespace.clone(),
            name: normalize_name(key).pascal_case,
        }
    }

    fn resolve_schema(&self, schema: &Schema) -> IrType {
        let resolved = self.resolve_shape(schema);
        if schema.is_nullable() {
            IrType::Nullable(Box::new(resolved))
        } else {
            resolved
        }
    }

    fn resolve_shape(&self, schema: &Schema) -> IrType {
        if schema.is_array() {
            let items = schema.items.as_deref();
            return IrType::Array(Box::new(self.resolve(items)));
        }

        if let Some(value) = map_value_schema(schema) {
            return IrType::Map(Box::new(self.resolve(value)));
        }

        let Some(type_name) = schema.schema_type.as_ref().and_then(TypeSet::primary) else {
            debug!("schema without a type maps to an untyped value");
            return IrType::Any;
        };

        if let Some(format) = schema.format.as_deref()
            && let Some(overridden) = format_override(type_name, format)
        {
            return overridden;
        }

        match type_name {
            "string" => IrType::String,
            "integer" => IrType::Int32,
            "number" => IrType::Double,
            "boolean" => IrType::Boolean,
            other => {
                debug!("unrecognised schema type `{other}` maps to an untyped value");
                IrType::Any
            }
        }
    }
}

/// The value schema of a map-shaped schema.
///
/// `Some(None)` means a map of untyped values (`additionalProperties: true`
/// without declared properties).
fn map_value_schema(schema: &Schema) -> Option<Option<&SchemaOrRef>> {
    match schema.additional_properties.as_ref()? {
        AdditionalProperties::Schema(value) => Some(Some(value.as_ref())),
        AdditionalProperties::Bool(true) if schema.properties.is_empty() => Some(None),
        AdditionalProperties::Bool(_) => None,
    }
}

fn format_override(type_name: &str, format: &str) -> Option<IrType> {
    let mapped = match (type_name, format) {
        ("integer", "int32") => IrType::Int32,
        ("integer", "int64") => IrType::Int64,
        ("number", "float") => IrType::Float,
        ("number", "double") => IrType::Double,
        ("string", "date") => IrType::Date,
        ("string", "date-time") => IrType::DateTime,
        ("string", "byte" | "binary") => IrType::Bytes,
        ("string", "uuid") => IrType::Uuid,
        _ => return None,
    };
    Some(mapped)
}
