//! Built-in schema keywords

pub mod custom;
pub mod email;
pub mod enumeration;
pub mod format;
pub mod length;
pub mod numeric;
pub mod pattern;
pub mod required;
pub mod types;

pub use custom::CustomFormat;
pub use email::EmailFormat;
pub use enumeration::EnumKeyword;
pub use format::FormatKeyword;
pub use length::LengthKeyword;
pub use numeric::NumericKeyword;
pub use pattern::PatternKeyword;
pub use required::RequiredKeyword;
pub use types::TypeKeyword;

use serde_json::Value;

/// JSON Schema type name of a value
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if is_integer(n) => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether a number has no fractional part
pub fn is_integer(number: &serde_json::Number) -> bool {
    if number.is_i64() || number.is_u64() {
        return true;
    }
    number.as_f64().map_or(false, |f| f.fract() == 0.0)
}

/// Append an object key to a JSON pointer fragment
pub fn child_path(path: &str, key: &str) -> String {
    let escaped = key.replace('~', "~0").replace('/', "~1");
    format!("{}/{}", path, escaped)
}

/// Append an array index to a JSON pointer fragment
pub fn index_path(path: &str, index: usize) -> String {
    format!("{}/{}", path, index)
}
