//! Core validation traits

use crate::error::{ValidationResult, Violations};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A document validator consulted by the write pipeline
///
/// Implementations check `document` against `schema` and report either a
/// list of violations or a single validator failure.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validate a document against a schema
    async fn validate(&self, document: &Value, schema: &Value) -> ValidationResult<()>;

    /// Name used in diagnostics
    fn name(&self) -> &'static str {
        "validator"
    }
}

/// One schema keyword checked against the value at a single schema node
pub trait Keyword: Send + Sync {
    /// The schema keyword this rule handles, e.g. `minLength`
    fn keyword(&self) -> &'static str;

    /// Check `value` against the keyword `argument`.
    ///
    /// `schema` is the enclosing schema node, for keywords that read
    /// sibling keywords. Violations are appended to `violations`; an `Err`
    /// means the schema itself is malformed.
    fn check(
        &self,
        argument: &Value,
        value: &Value,
        schema: &Map<String, Value>,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()>;
}
