use super::types::NormalizedName;

/// A resolved output type.
///
/// Produced only by the type mapper; generators render it but never resolve
/// references themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum IrType {
    String,
    Int32,
    Int64,
    Float,
    Double,
    Boolean,
    /// Calendar date without time zone.
    Date,
    /// Timestamp with UTC offset.
    DateTime,
    Bytes,
    Uuid,
    Array(Box<IrType>),
    /// String-keyed map.
    Map(Box<IrType>),
    /// A named component schema, qualified by the configured model namespace.
    Ref { namespace: String, name: String },
    /// Optional value, distinct from the zero value of the inner type.
    Nullable(Box<IrType>),
    /// Untyped placeholder for absent or unrecognised descriptors.
    Any,
}

impl IrType {
    /// Fully qualified name of a reference, e.g. `crate::models::Pet`.
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            IrType::Ref { namespace, name } if namespace.is_empty() => Some(name.clone()),
            IrType::Ref { namespace, name } => Some(format!("{namespace}::{name}")),
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, IrType::Nullable(_))
    }
}

/// A component schema turned into a data model.
#[derive(Debug, Clone)]
pub struct IrModel {
    pub name: NormalizedName,
    pub description: Option<String>,
    /// Fields in declared property order. Empty for enums and aliases.
    pub fields: Vec<IrField>,
}

/// A field on a data model.
#[derive(Debug, Clone)]
pub struct IrField {
    pub original_name: String,
    /// camelCase identifier derived from `original_name`.
    pub field_name: String,
    /// Field type; wrapped in [`IrType::Nullable`] when not required.
    pub field_type: IrType,
    pub required: bool,
    pub description: Option<String>,
}
