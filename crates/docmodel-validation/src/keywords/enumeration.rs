//! `enum` keyword

use crate::error::{ValidationError, ValidationResult, Violation, Violations};
use crate::traits::Keyword;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct EnumKeyword;

impl EnumKeyword {
    pub fn new() -> Self {
        Self
    }
}

impl Keyword for EnumKeyword {
    fn keyword(&self) -> &'static str {
        "enum"
    }

    fn check(
        &self,
        argument: &Value,
        value: &Value,
        _schema: &Map<String, Value>,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()> {
        let allowed = argument
            .as_array()
            .ok_or_else(|| ValidationError::Validator("keyword `enum` must be an array".to_string()))?;

        if !allowed.contains(value) {
            violations.push(
                Violation::new("ENUM_MISMATCH", path, format!("No enum match for: {}", value))
                    .params(serde_json::json!({ "allowed": allowed })),
            );
        }
        Ok(())
    }
}
