use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

use crate::ir::NormalizedName;

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: leading_digit_guard(sanitized.to_pascal_case()),
        camel_case: leading_digit_guard(sanitized.to_lower_camel_case()),
        snake_case: leading_digit_guard(sanitized.to_snake_case()),
        screaming_snake: leading_digit_guard(sanitized.to_shouty_snake_case()),
    }
}

// heck drops the `_` that `sanitize_identifier` puts before a leading digit.
fn leading_digit_guard(cased: String) -> String {
    if cased.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{cased}")
    } else {
        cased
    }
}

/// Derive an operation identifier from HTTP method + path when the document
/// has no `operationId`: the lower-cased method followed by the path with
/// every non-alphanumeric character removed.
///
/// - `GET /pets/{id}` → `getpetsid`
/// - `POST /store/order` → `poststoreorder`
pub fn synthesize_operation_id(method: &str, path: &str) -> String {
    let mut id = method.to_lowercase();
    id.extend(path.chars().filter(char::is_ascii_alphanumeric));
    id
}

/// Turn a document name into a camelCase field name.
///
/// `-`, `_` and spaces are dropped and the character after each is
/// upper-cased; the first character is lower-cased. Other characters are
/// kept as-is.
///
/// - `pet-id` → `petId`
/// - `created_at` → `createdAt`
/// - `X-Request-ID` → `xRequestID`
pub fn to_field_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = false;

    for ch in name.chars() {
        if matches!(ch, '-' | '_' | ' ') {
            capitalize_next = true;
        } else if capitalize_next && !result.is_empty() {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else if result.is_empty() {
            result.extend(ch.to_lowercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }

    result
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for (i, ch) in name.chars().enumerate() {
        if ch.is_alphanumeric() {
            if i == 0 && ch.is_ascii_digit() {
                result.push('_');
            }
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}
