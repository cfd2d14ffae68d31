use heck::ToSnakeCase;
use oact_core::ir::IrType;

/// Keywords usable as raw identifiers (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

// Keywords that can't be used as identifiers, even with `r#`.
const RESERVED: &[&str] = &["crate", "self", "super", "Self"];

/// Map an `IrType` to its Rust type.
pub fn ir_type_to_rust(ir_type: &IrType) -> String {
    match ir_type {
        IrType::String => "String".to_string(),
        IrType::Int32 => "i32".to_string(),
        IrType::Int64 => "i64".to_string(),
        IrType::Float => "f32".to_string(),
        IrType::Double => "f64".to_string(),
        IrType::Boolean => "bool".to_string(),
        IrType::Date => "chrono::NaiveDate".to_string(),
        IrType::DateTime => "chrono::DateTime<chrono::FixedOffset>".to_string(),
        IrType::Bytes => "Vec<u8>".to_string(),
        IrType::Uuid => "uuid::Uuid".to_string(),
        IrType::Any => "serde_json::Value".to_string(),
        IrType::Array(inner) => format!("Vec<{}>", ir_type_to_rust(inner)),
        IrType::Map(value) => format!(
            "std::collections::HashMap<String, {}>",
            ir_type_to_rust(value)
        ),
        IrType::Ref { namespace, name } if namespace.is_empty() => name.clone(),
        IrType::Ref { namespace, name } => format!("{namespace}::{name}"),
        IrType::Nullable(inner) => format!("Option<{}>", ir_type_to_rust(inner)),
    }
}

/// Map a model field type, boxing direct references to the enclosing model.
///
/// `Option<Node>` inside `Node` would have infinite size; `Vec` and map
/// values already live on the heap and are left alone. A required self
/// reference is still rendered as `Option<Box<Node>>`: a value of that type
/// could never be constructed, and `Default` would recurse forever.
pub fn ir_type_to_rust_field(ir_type: &IrType, enclosing: &str) -> String {
    match ir_type {
        IrType::Nullable(inner) if is_self_reference(inner, enclosing) => {
            format!("Option<Box<{}>>", ir_type_to_rust(inner))
        }
        _ if is_self_reference(ir_type, enclosing) => {
            format!("Option<Box<{}>>", ir_type_to_rust(ir_type))
        }
        other => ir_type_to_rust(other),
    }
}

/// Whether a model field renders as an `Option`.
pub fn is_optional_field(ir_type: &IrType, enclosing: &str) -> bool {
    ir_type.is_nullable() || is_self_reference(ir_type, enclosing)
}

fn is_self_reference(ir_type: &IrType, enclosing: &str) -> bool {
    matches!(ir_type, IrType::Ref { name, .. } if name == enclosing)
}

/// snake_case form of a camelCase field name, before keyword escaping.
pub fn snake_name(name: &str) -> String {
    let snake = name.to_snake_case();
    if snake.is_empty() {
        "unnamed".to_string()
    } else if snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{snake}")
    } else if RESERVED.contains(&snake.as_str()) {
        format!("_{snake}")
    } else {
        snake
    }
}

/// A snake_case Rust identifier for a field, argument or module name.
///
/// - `petId` → `pet_id`
/// - `type` → `r#type`
/// - `self` → `_self`
pub fn rust_ident(name: &str) -> String {
    escape_keyword(&snake_name(name))
}

/// Prefix `ident` with `r#` if it is a keyword.
pub fn escape_keyword(ident: &str) -> String {
    if RAW_KEYWORDS.contains(&ident) {
        format!("r#{ident}")
    } else {
        ident.to_string()
    }
}

/// Split free text into doc comment lines, each prefixed with a space unless
/// blank, so templates can render `///{{ line }}`.
pub fn doc_lines(text: &str) -> Vec<String> {
    text.trim()
        .lines()
        .map(str::trim_end)
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!(" {line}")
            }
        })
        .collect()
}

/// A Rust string literal for `value`.
pub fn string_literal(value: &str) -> String {
    format!("{value:?}")
}
