use std::collections::HashSet;

use super::components::Components;
use super::parameter::{Parameter, ParameterOrRef};
use super::request_body::{RequestBody, RequestBodyOrRef};
use super::response::{Response, ResponseOrRef};
use super::schema::{AdditionalProperties, SchemaOrRef};
use super::spec::OpenApiSpec;
use crate::error::ResolveError;

/// Resolves component `$ref` pointers for parameters, request bodies and
/// responses, and checks that schema references point at a declared
/// component schema.
///
/// Schema references are never inlined: generated types are nominal, so a
/// schema `$ref` only needs to name an existing component.
pub struct RefResolver<'a> {
    components: Option<&'a Components>,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            components: spec.components.as_ref(),
        }
    }

    pub fn resolve_parameter(&self, param: &ParameterOrRef) -> Result<Parameter, ResolveError> {
        let mut seen = HashSet::new();
        let mut current = param;
        loop {
            match current {
                ParameterOrRef::Parameter(p) => return Ok(p.clone()),
                ParameterOrRef::Ref { ref_path } => {
                    guard_cycle(&mut seen, ref_path)?;
                    let name = parse_ref_name(ref_path, "parameters")?;
                    current = self
                        .components
                        .and_then(|c| c.parameters.get(name))
                        .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.clone()))?;
                }
            }
        }
    }

    pub fn resolve_request_body(
        &self,
        body: &RequestBodyOrRef,
    ) -> Result<RequestBody, ResolveError> {
        let mut seen = HashSet::new();
        let mut current = body;
        loop {
            match current {
                RequestBodyOrRef::RequestBody(rb) => return Ok(rb.clone()),
                RequestBodyOrRef::Ref { ref_path } => {
                    guard_cycle(&mut seen, ref_path)?;
                    let name = parse_ref_name(ref_path, "requestBodies")?;
                    current = self
                        .components
                        .and_then(|c| c.request_bodies.get(name))
                        .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.clone()))?;
                }
            }
        }
    }

    pub fn resolve_response(&self, resp: &ResponseOrRef) -> Result<Response, ResolveError> {
        let mut seen = HashSet::new();
        let mut current = resp;
        loop {
            match current {
                ResponseOrRef::Response(r) => return Ok(r.clone()),
                ResponseOrRef::Ref { ref_path } => {
                    guard_cycle(&mut seen, ref_path)?;
                    let name = parse_ref_name(ref_path, "responses")?;
                    current = self
                        .components
                        .and_then(|c| c.responses.get(name))
                        .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.clone()))?;
                }
            }
        }
    }

    /// Check every schema `$ref` reachable from `schema` without following
    /// the references themselves, so self-referential schemas terminate.
    pub fn validate_schema_refs(&self, schema: &SchemaOrRef) -> Result<(), ResolveError> {
        match schema {
            SchemaOrRef::Ref { ref_path } => {
                let name = parse_ref_name(ref_path, "schemas")?;
                let declared = self
                    .components
                    .is_some_and(|c| c.schemas.contains_key(name));
                if declared {
                    Ok(())
                } else {
                    Err(ResolveError::RefTargetNotFound(ref_path.clone()))
                }
            }
            SchemaOrRef::Schema(s) => {
                for prop in s.properties.values() {
                    self.validate_schema_refs(prop)?;
                }
                if let Some(items) = &s.items {
                    self.validate_schema_refs(items)?;
                }
                if let Some(AdditionalProperties::Schema(value)) = &s.additional_properties {
                    self.validate_schema_refs(value)?;
                }
                Ok(())
            }
        }
    }
}

fn guard_cycle(seen: &mut HashSet<String>, ref_path: &str) -> Result<(), ResolveError> {
    if seen.insert(ref_path.to_string()) {
        Ok(())
    } else {
        Err(ResolveError::RefTargetNotFound(format!(
            "{ref_path} (reference cycle)"
        )))
    }
}

/// Parse a `$ref` path like `#/components/schemas/Foo` and extract the name.
fn parse_ref_name<'a>(ref_path: &'a str, expected_section: &str) -> Result<&'a str, ResolveError> {
    let stripped = ref_path
        .strip_prefix("#/components/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let (section, name) = stripped
        .split_once('/')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    if section != expected_section {
        return Err(ResolveError::InvalidRefFormat(format!(
            "expected section '{}', got '{}' in {}",
            expected_section, section, ref_path
        )));
    }
    Ok(name)
}
