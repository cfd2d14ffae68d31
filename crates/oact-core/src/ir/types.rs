use std::fmt;

use super::operations::IrOperation;
use super::schemas::IrModel;

/// A fully resolved, generator-ready intermediate representation of an OpenAPI spec.
#[derive(Debug, Clone)]
pub struct IrSpec {
    pub info: IrInfo,
    /// Operations in path-then-method order.
    pub operations: Vec<IrOperation>,
    /// One entry per component schema, in declared order.
    pub models: Vec<IrModel>,
}

/// API metadata.
#[derive(Debug, Clone)]
pub struct IrInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
    pub screaming_snake: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
