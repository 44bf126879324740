//! Violation and validation error types

use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// A single schema violation found in a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    /// Machine-readable violation code, e.g. `INVALID_TYPE`
    pub code: String,
    /// JSON pointer fragment of the offending value, e.g. `#/person/age`
    pub path: String,
    /// Human-readable message
    pub message: String,
    /// Keyword parameters involved in the violation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Violation {
    /// Create a new violation
    pub fn new(code: impl Into<String>, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
            message: message.into(),
            params: None,
        }
    }

    /// Attach keyword parameters
    pub fn params(mut self, params: serde_json::Value) -> Self {
        self.params = Some(params);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.code, self.path, self.message)
    }
}

/// Ordered list of violations, in the order they were found
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Violations {
    items: Vec<Violation>,
}

impl Violations {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a single violation
    pub fn push(&mut self, violation: Violation) {
        self.items.push(violation);
    }

    /// Append every violation of `other`, keeping order
    pub fn merge(&mut self, other: Violations) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.items.iter()
    }

    /// Violation codes in order
    pub fn codes(&self) -> Vec<&str> {
        self.items.iter().map(|v| v.code.as_str()).collect()
    }

    /// Violations reported for one exact path
    pub fn at_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.items.iter().filter(move |v| v.path == path)
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.items
    }

    /// JSON shape for API responses
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": "validation_failed",
                "message": "Validation failed",
                "details": self.items
            }
        })
    }
}

impl From<Violation> for Violations {
    fn from(violation: Violation) -> Self {
        Self { items: vec![violation] }
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(items: Vec<Violation>) -> Self {
        Self { items }
    }
}

impl Extend<Violation> for Violations {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            write!(f, "No violations")
        } else {
            write!(f, "Document failed validation with {} violation(s):", self.items.len())?;
            for violation in &self.items {
                write!(f, "\n  {}", violation)?;
            }
            Ok(())
        }
    }
}

/// Outcome of a failed validation
///
/// Callers tell schema violations from validator failures by shape:
/// `Violations` always carries a list, `Validator` a single message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0}")]
    Violations(Violations),

    #[error("Validator error: {0}")]
    Validator(String),
}

impl ValidationError {
    /// The violation list, when this error has list shape
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            ValidationError::Violations(violations) => Some(violations),
            ValidationError::Validator(_) => None,
        }
    }

    pub fn is_violations(&self) -> bool {
        matches!(self, ValidationError::Violations(_))
    }
}

impl From<Violations> for ValidationError {
    fn from(violations: Violations) -> Self {
        ValidationError::Violations(violations)
    }
}

impl From<Violation> for ValidationError {
    fn from(violation: Violation) -> Self {
        ValidationError::Violations(violation.into())
    }
}
