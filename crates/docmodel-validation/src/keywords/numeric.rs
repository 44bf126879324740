//! `minimum` and `maximum` keywords
//!
//! Draft 4 expresses exclusive bounds as the boolean siblings
//! `exclusiveMinimum` and `exclusiveMaximum`.

use crate::error::{ValidationError, ValidationResult, Violation, Violations};
use crate::traits::Keyword;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Minimum,
    Maximum,
}

/// Numeric range bound
#[derive(Debug, Clone)]
pub struct NumericKeyword {
    bound: Bound,
}

impl NumericKeyword {
    /// `minimum`
    pub fn minimum() -> Self {
        Self { bound: Bound::Minimum }
    }

    /// `maximum`
    pub fn maximum() -> Self {
        Self { bound: Bound::Maximum }
    }

    fn exclusive_keyword(&self) -> &'static str {
        match self.bound {
            Bound::Minimum => "exclusiveMinimum",
            Bound::Maximum => "exclusiveMaximum",
        }
    }
}

impl Keyword for NumericKeyword {
    fn keyword(&self) -> &'static str {
        match self.bound {
            Bound::Minimum => "minimum",
            Bound::Maximum => "maximum",
        }
    }

    fn check(
        &self,
        argument: &Value,
        value: &Value,
        schema: &Map<String, Value>,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()> {
        let limit = argument
            .as_f64()
            .ok_or_else(|| ValidationError::Validator(format!("keyword `{}` must be a number", self.keyword())))?;

        let exclusive = match schema.get(self.exclusive_keyword()) {
            None => false,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => {
                return Err(ValidationError::Validator(format!(
                    "keyword `{}` must be a boolean",
                    self.exclusive_keyword()
                )))
            }
        };

        let Some(number) = value.as_f64() else {
            return Ok(());
        };

        let (failed, code, relation) = match (self.bound, exclusive) {
            (Bound::Minimum, false) => (number < limit, "MINIMUM", "less than minimum"),
            (Bound::Minimum, true) => (number <= limit, "MINIMUM_EXCLUSIVE", "less than or equal to exclusive minimum"),
            (Bound::Maximum, false) => (number > limit, "MAXIMUM", "greater than maximum"),
            (Bound::Maximum, true) => (number >= limit, "MAXIMUM_EXCLUSIVE", "greater than or equal to exclusive maximum"),
        };

        if failed {
            violations.push(
                Violation::new(code, path, format!("Value {} is {} {}", number, relation, limit))
                    .params(serde_json::json!({ "value": number, "limit": limit })),
            );
        }
        Ok(())
    }
}
