//! `pattern` keyword

use crate::error::{ValidationError, ValidationResult, Violation, Violations};
use crate::traits::Keyword;
use regex::Regex;
use serde_json::{Map, Value};

/// Matches strings against an ECMA-style regular expression (unanchored)
#[derive(Debug, Clone, Default)]
pub struct PatternKeyword;

impl PatternKeyword {
    pub fn new() -> Self {
        Self
    }
}

impl Keyword for PatternKeyword {
    fn keyword(&self) -> &'static str {
        "pattern"
    }

    fn check(
        &self,
        argument: &Value,
        value: &Value,
        _schema: &Map<String, Value>,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()> {
        let source = argument
            .as_str()
            .ok_or_else(|| ValidationError::Validator("keyword `pattern` must be a string".to_string()))?;
        let pattern = Regex::new(source)
            .map_err(|e| ValidationError::Validator(format!("keyword `pattern` is not a valid regex: {}", e)))?;

        let Some(text) = value.as_str() else {
            return Ok(());
        };

        if !pattern.is_match(text) {
            violations.push(
                Violation::new("PATTERN", path, format!("String does not match pattern {}: {}", source, text))
                    .params(serde_json::json!({ "pattern": source })),
            );
        }
        Ok(())
    }
}
