//! `minLength` and `maxLength` keywords

use crate::error::{ValidationError, ValidationResult, Violation, Violations};
use crate::traits::Keyword;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Min,
    Max,
}

/// String length bound, counted in characters
#[derive(Debug, Clone)]
pub struct LengthKeyword {
    bound: Bound,
}

impl LengthKeyword {
    /// `minLength`
    pub fn min() -> Self {
        Self { bound: Bound::Min }
    }

    /// `maxLength`
    pub fn max() -> Self {
        Self { bound: Bound::Max }
    }
}

impl Keyword for LengthKeyword {
    fn keyword(&self) -> &'static str {
        match self.bound {
            Bound::Min => "minLength",
            Bound::Max => "maxLength",
        }
    }

    fn check(
        &self,
        argument: &Value,
        value: &Value,
        _schema: &Map<String, Value>,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()> {
        let limit = argument.as_u64().ok_or_else(|| {
            ValidationError::Validator(format!("keyword `{}` must be a non-negative integer", self.keyword()))
        })?;

        let Some(text) = value.as_str() else {
            return Ok(());
        };
        let length = text.chars().count() as u64;

        let violation = match self.bound {
            Bound::Min if length < limit => Some(Violation::new(
                "MIN_LENGTH",
                path,
                format!("String is too short ({} chars), minimum {}", length, limit),
            )),
            Bound::Max if length > limit => Some(Violation::new(
                "MAX_LENGTH",
                path,
                format!("String is too long ({} chars), maximum {}", length, limit),
            )),
            _ => None,
        };

        if let Some(violation) = violation {
            violations.push(violation.params(serde_json::json!({ "length": length, "limit": limit })));
        }
        Ok(())
    }
}
