//! `required` keyword

use crate::error::{ValidationError, ValidationResult, Violation, Violations};
use crate::traits::Keyword;
use serde_json::{Map, Value};

/// Reports every listed property missing from an object
#[derive(Debug, Clone, Default)]
pub struct RequiredKeyword;

impl RequiredKeyword {
    pub fn new() -> Self {
        Self
    }
}

impl Keyword for RequiredKeyword {
    fn keyword(&self) -> &'static str {
        "required"
    }

    fn check(
        &self,
        argument: &Value,
        value: &Value,
        _schema: &Map<String, Value>,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()> {
        let names = argument.as_array().ok_or_else(|| {
            ValidationError::Validator("keyword `required` must be an array of property names".to_string())
        })?;

        // Only objects carry properties
        let Value::Object(fields) = value else {
            return Ok(());
        };

        for name in names {
            let name = name.as_str().ok_or_else(|| {
                ValidationError::Validator("keyword `required` must contain only strings".to_string())
            })?;

            if !fields.contains_key(name) {
                violations.push(
                    Violation::new(
                        "OBJECT_MISSING_REQUIRED_PROPERTY",
                        path,
                        format!("Missing required property: {}", name),
                    )
                    .params(serde_json::json!({ "property": name })),
                );
            }
        }
        Ok(())
    }
}
