use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The `type` field can be a single type or an array of types.
///
/// Type names are kept as strings so that unrecognised types still parse and
/// can degrade to an untyped value during mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeSet {
    /// The effective type name, skipping a `null` member of a type array.
    pub fn primary(&self) -> Option<&str> {
        match self {
            TypeSet::Single(t) => Some(t.as_str()),
            TypeSet::Multiple(types) => types
                .iter()
                .map(String::as_str)
                .find(|t| *t != "null")
                .or_else(|| types.first().map(String::as_str)),
        }
    }
}

/// A reference or inline schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

/// The practical JSON Schema subset understood by the type mapper.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// OpenAPI 3.0 `nullable: true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    // Object properties
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    // Array items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,
}

impl Schema {
    /// Whether `null` is an allowed value, via `nullable: true` (3.0) or a
    /// `null` member of a type array (3.1).
    pub fn is_nullable(&self) -> bool {
        self.nullable == Some(true)
            || matches!(&self.schema_type, Some(TypeSet::Multiple(types)) if types.iter().any(|t| t == "null"))
    }

    /// Whether the schema is an array, either by `type` or by carrying `items`.
    pub fn is_array(&self) -> bool {
        match self.schema_type.as_ref().and_then(TypeSet::primary) {
            Some(t) => t == "array",
            None => self.items.is_some(),
        }
    }
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}
