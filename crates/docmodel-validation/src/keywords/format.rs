//! `format` keyword

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationResult, Violation, Violations};
use crate::keywords::{CustomFormat, EmailFormat};
use crate::traits::Keyword;

/// Checks string formats: `date`, `date-time`, `email` and any registered
/// custom format. Unknown format names are ignored.
#[derive(Debug, Clone, Default)]
pub struct FormatKeyword {
    email: EmailFormat,
    custom: HashMap<String, CustomFormat>,
}

impl FormatKeyword {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom format, replacing any format with the same name
    pub fn register(&mut self, format: CustomFormat) {
        self.custom.insert(format.name().to_string(), format);
    }

    /// Replace the email format settings
    pub fn email(&mut self, email: EmailFormat) {
        self.email = email;
    }

    pub fn is_known(&self, name: &str) -> bool {
        matches!(name, "date" | "date-time" | "email") || self.custom.contains_key(name)
    }

    /// `None` when the format name is unknown
    fn conforms(&self, name: &str, text: &str) -> Option<bool> {
        // Custom formats may override the built-ins
        if let Some(format) = self.custom.get(name) {
            return Some(format.is_valid(text));
        }
        match name {
            "date" => Some(is_full_date(text)),
            "date-time" => Some(DateTime::parse_from_rfc3339(text).is_ok()),
            "email" => Some(self.email.is_valid(text)),
            _ => None,
        }
    }
}

/// RFC 3339 `full-date`: exactly `YYYY-MM-DD` and a real calendar day
fn is_full_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    shaped && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

impl Keyword for FormatKeyword {
    fn keyword(&self) -> &'static str {
        "format"
    }

    fn check(
        &self,
        argument: &Value,
        value: &Value,
        _schema: &Map<String, Value>,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()> {
        let name = argument
            .as_str()
            .ok_or_else(|| ValidationError::Validator("keyword `format` must be a string".to_string()))?;

        let Some(text) = value.as_str() else {
            return Ok(());
        };

        match self.conforms(name, text) {
            Some(true) => {}
            Some(false) => violations.push(
                Violation::new(
                    "INVALID_FORMAT",
                    path,
                    format!("Object didn't pass validation for format {}: {}", name, text),
                )
                .params(serde_json::json!({ "format": name, "value": text })),
            ),
            None => tracing::trace!("ignoring unknown format `{}` at {}", name, path),
        }
        Ok(())
    }
}
