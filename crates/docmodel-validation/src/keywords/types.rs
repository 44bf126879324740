//! `type` keyword

use crate::error::{ValidationError, ValidationResult, Violation, Violations};
use crate::keywords::json_type_name;
use crate::traits::Keyword;
use serde_json::{Map, Value};

const KNOWN_TYPES: [&str; 7] = ["array", "boolean", "integer", "null", "number", "object", "string"];

/// Checks the JSON type of a value; `integer` also satisfies `number`
#[derive(Debug, Clone, Default)]
pub struct TypeKeyword;

impl TypeKeyword {
    pub fn new() -> Self {
        Self
    }

    fn matches(expected: &str, actual: &str) -> bool {
        expected == actual || (expected == "number" && actual == "integer")
    }

    fn expected_types(argument: &Value) -> ValidationResult<Vec<&str>> {
        let names: Vec<&str> = match argument {
            Value::String(name) => vec![name.as_str()],
            Value::Array(names) => names
                .iter()
                .map(|name| {
                    name.as_str().ok_or_else(|| {
                        ValidationError::Validator("keyword `type` must list type names as strings".to_string())
                    })
                })
                .collect::<ValidationResult<_>>()?,
            _ => {
                return Err(ValidationError::Validator(
                    "keyword `type` must be a string or an array of strings".to_string(),
                ))
            }
        };

        if let Some(unknown) = names.iter().find(|name| !KNOWN_TYPES.contains(name)) {
            return Err(ValidationError::Validator(format!("unknown type `{}` in keyword `type`", unknown)));
        }
        Ok(names)
    }
}

impl Keyword for TypeKeyword {
    fn keyword(&self) -> &'static str {
        "type"
    }

    fn check(
        &self,
        argument: &Value,
        value: &Value,
        _schema: &Map<String, Value>,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()> {
        let expected = Self::expected_types(argument)?;
        let actual = json_type_name(value);

        if !expected.iter().any(|name| Self::matches(name, actual)) {
            let expected = expected.join(",");
            violations.push(
                Violation::new(
                    "INVALID_TYPE",
                    path,
                    format!("Expected type {} but found type {}", expected, actual),
                )
                .params(serde_json::json!({ "expected": expected, "actual": actual })),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(argument: Value, value: Value) -> ValidationResult<Violations> {
        let mut violations = Violations::new();
        TypeKeyword::new().check(&argument, &value, &Map::new(), "#/age", &mut violations)?;
        Ok(violations)
    }

    #[test]
    fn test_integer_accepts_whole_numbers() {
        assert!(check(json!("integer"), json!(35)).unwrap().is_empty());
        assert!(check(json!("number"), json!(35)).unwrap().is_empty());
        assert!(check(json!("number"), json!(3.5)).unwrap().is_empty());
    }

    #[test]
    fn test_null_is_not_an_integer() {
        let violations = check(json!("integer"), json!(null)).unwrap();
        assert_eq!(violations.codes(), vec!["INVALID_TYPE"]);
        let violation = violations.iter().next().unwrap();
        assert_eq!(violation.path, "#/age");
        assert_eq!(violation.message, "Expected type integer but found type null");
    }

    #[test]
    fn test_type_union() {
        assert!(check(json!(["string", "null"]), json!(null)).unwrap().is_empty());
        assert_eq!(check(json!(["string", "null"]), json!(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_type_keyword() {
        assert!(matches!(check(json!(5), json!(1)), Err(ValidationError::Validator(_))));
        assert!(matches!(check(json!("text"), json!(1)), Err(ValidationError::Validator(_))));
    }
}
