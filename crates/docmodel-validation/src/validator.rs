//! JSON Schema validator
//!
//! Supports the draft 4 keywords documents are usually described with:
//! `type`, `properties`, `required`, `additionalProperties`, `items`,
//! `enum`, `minLength`, `maxLength`, `minimum`, `maximum`, `pattern` and
//! `format`. Every violation in a document is reported, in schema order.
//! A malformed schema yields [`ValidationError::Validator`] instead of a
//! violation list.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationResult, Violation, Violations};
use crate::keywords::{
    child_path, index_path, CustomFormat, EmailFormat, EnumKeyword, FormatKeyword, LengthKeyword,
    NumericKeyword, PatternKeyword, RequiredKeyword, TypeKeyword,
};
use crate::traits::{Keyword, Validator};

/// Validates documents against JSON Schema documents
pub struct JsonSchemaValidator {
    keywords: Vec<Box<dyn Keyword>>,
    format: FormatKeyword,
}

impl JsonSchemaValidator {
    /// Validator with the built-in keywords
    pub fn new() -> Self {
        Self {
            keywords: vec![
                Box::new(TypeKeyword::new()),
                Box::new(RequiredKeyword::new()),
                Box::new(EnumKeyword::new()),
                Box::new(LengthKeyword::min()),
                Box::new(LengthKeyword::max()),
                Box::new(NumericKeyword::minimum()),
                Box::new(NumericKeyword::maximum()),
                Box::new(PatternKeyword::new()),
            ],
            format: FormatKeyword::new(),
        }
    }

    /// Register a custom string format
    pub fn with_format(mut self, format: CustomFormat) -> Self {
        self.format.register(format);
        self
    }

    /// Replace the `email` format settings
    pub fn with_email_format(mut self, email: EmailFormat) -> Self {
        self.format.email(email);
        self
    }

    /// Add a keyword checked after the built-in ones
    pub fn with_keyword(mut self, keyword: Box<dyn Keyword>) -> Self {
        self.keywords.push(keyword);
        self
    }

    /// Validate synchronously, returning every violation found
    pub fn check(&self, document: &Value, schema: &Value) -> ValidationResult<Violations> {
        let mut violations = Violations::new();
        self.validate_node(document, schema, "#", &mut violations)?;
        Ok(violations)
    }

    fn validate_node(
        &self,
        value: &Value,
        schema: &Value,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()> {
        let node = schema
            .as_object()
            .ok_or_else(|| ValidationError::Validator(format!("schema at {} must be an object", path)))?;

        for keyword in &self.keywords {
            if let Some(argument) = node.get(keyword.keyword()) {
                keyword.check(argument, value, node, path, violations)?;
            }
        }
        if let Some(argument) = node.get(self.format.keyword()) {
            self.format.check(argument, value, node, path, violations)?;
        }

        match value {
            Value::Object(fields) => self.validate_object(fields, node, path, violations),
            Value::Array(items) => self.validate_items(items, node, path, violations),
            _ => Ok(()),
        }
    }

    fn validate_object(
        &self,
        fields: &Map<String, Value>,
        node: &Map<String, Value>,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()> {
        let empty = Map::new();
        let properties = match node.get("properties") {
            None => &empty,
            Some(Value::Object(properties)) => properties,
            Some(_) => {
                return Err(ValidationError::Validator(format!(
                    "keyword `properties` at {} must be an object",
                    path
                )))
            }
        };

        for (name, property_schema) in properties {
            if let Some(field) = fields.get(name) {
                self.validate_node(field, property_schema, &child_path(path, name), violations)?;
            }
        }

        let extra: Vec<&String> = fields.keys().filter(|name| !properties.contains_key(*name)).collect();
        match node.get("additionalProperties") {
            None | Some(Value::Bool(true)) => {}
            Some(Value::Bool(false)) => {
                if !extra.is_empty() {
                    let names: Vec<&str> = extra.iter().map(|name| name.as_str()).collect();
                    violations.push(
                        Violation::new(
                            "OBJECT_ADDITIONAL_PROPERTIES",
                            path,
                            format!("Additional properties not allowed: {}", names.join(",")),
                        )
                        .params(serde_json::json!({ "properties": names })),
                    );
                }
            }
            Some(extra_schema @ Value::Object(_)) => {
                for name in extra {
                    self.validate_node(&fields[name.as_str()], extra_schema, &child_path(path, name), violations)?;
                }
            }
            Some(_) => {
                return Err(ValidationError::Validator(format!(
                    "keyword `additionalProperties` at {} must be a boolean or an object",
                    path
                )))
            }
        }
        Ok(())
    }

    fn validate_items(
        &self,
        items: &[Value],
        node: &Map<String, Value>,
        path: &str,
        violations: &mut Violations,
    ) -> ValidationResult<()> {
        match node.get("items") {
            None => Ok(()),
            Some(item_schema @ Value::Object(_)) => {
                for (index, item) in items.iter().enumerate() {
                    self.validate_node(item, item_schema, &index_path(path, index), violations)?;
                }
                Ok(())
            }
            // Tuple validation: one schema per position
            Some(Value::Array(schemas)) => {
                for (index, (item, item_schema)) in items.iter().zip(schemas).enumerate() {
                    self.validate_node(item, item_schema, &index_path(path, index), violations)?;
                }
                Ok(())
            }
            Some(_) => Err(ValidationError::Validator(format!(
                "keyword `items` at {} must be an object or an array",
                path
            ))),
        }
    }
}

impl Default for JsonSchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keywords: Vec<&str> = self.keywords.iter().map(|k| k.keyword()).collect();
        f.debug_struct("JsonSchemaValidator")
            .field("keywords", &keywords)
            .field("format", &self.format)
            .finish()
    }
}

#[async_trait]
impl Validator for JsonSchemaValidator {
    async fn validate(&self, document: &Value, schema: &Value) -> ValidationResult<()> {
        let violations = self.check(document, schema)?;
        tracing::debug!("json schema validation finished with {} violation(s)", violations.len());

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Violations(violations))
        }
    }

    fn name(&self) -> &'static str {
        "json-schema"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "person": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "age": { "type": "integer" },
                        "dateOfBirth": { "type": "string", "format": "date" }
                    },
                    "additionalProperties": false,
                    "required": ["name", "age", "dateOfBirth"]
                },
                "_id": { "type": "string" }
            },
            "additionalProperties": false,
            "required": ["person"]
        })
    }

    #[tokio::test]
    async fn test_valid_document() {
        let validator = JsonSchemaValidator::new();
        let document = json!({
            "_id": "frank::1964-12-25",
            "person": { "name": "Frank", "age": 50, "dateOfBirth": "1964-12-25" }
        });

        assert!(validator.validate(&document, &user_schema()).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_document_is_missing_person() {
        let validator = JsonSchemaValidator::new();
        let err = validator.validate(&json!({}), &user_schema()).await.unwrap_err();

        let violations = err.violations().unwrap();
        assert_eq!(violations.codes(), vec!["OBJECT_MISSING_REQUIRED_PROPERTY"]);
        assert_eq!(violations.iter().next().unwrap().path, "#");
    }

    #[tokio::test]
    async fn test_bad_date_is_invalid_format() {
        let validator = JsonSchemaValidator::new();
        let document = json!({
            "person": { "name": "Fred", "age": 35, "dateOfBirth": "05-10-1981" }
        });

        let err = validator.validate(&document, &user_schema()).await.unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.codes(), vec!["INVALID_FORMAT"]);
        assert_eq!(violations.iter().next().unwrap().path, "#/person/dateOfBirth");
    }

    #[tokio::test]
    async fn test_collects_every_violation() {
        let validator = JsonSchemaValidator::new();
        let document = json!({
            "person": { "name": 7, "age": null, "dateOfBirth": "1965-10-05", "nickname": "x" },
            "extra": true
        });

        let violations = validator.check(&document, &user_schema()).unwrap();
        let codes = violations.codes();
        assert_eq!(codes.iter().filter(|c| **c == "INVALID_TYPE").count(), 2);
        assert_eq!(codes.iter().filter(|c| **c == "OBJECT_ADDITIONAL_PROPERTIES").count(), 2);
        assert_eq!(violations.at_path("#/person/age").count(), 1);
    }

    #[test]
    fn test_items_and_additional_schema() {
        let schema = json!({
            "type": "object",
            "properties": {
                "tags": { "type": "array", "items": { "type": "string", "minLength": 2 } }
            },
            "additionalProperties": { "type": "integer" }
        });
        let document = json!({ "tags": ["ok", "x", 3], "score": "high" });

        let violations = JsonSchemaValidator::new().check(&document, &schema).unwrap();
        assert_eq!(violations.at_path("#/tags/1").next().unwrap().code, "MIN_LENGTH");
        assert_eq!(violations.at_path("#/tags/2").next().unwrap().code, "INVALID_TYPE");
        assert_eq!(violations.at_path("#/score").next().unwrap().code, "INVALID_TYPE");
    }

    #[tokio::test]
    async fn test_malformed_schema_is_single_error() {
        let validator = JsonSchemaValidator::new();
        let schema = json!({ "type": "object", "properties": { "age": { "type": "whole" } } });

        let err = validator.validate(&json!({ "age": 1 }), &schema).await.unwrap_err();
        assert!(matches!(err, ValidationError::Validator(_)));
    }

    #[tokio::test]
    async fn test_custom_format_registration() {
        let validator = JsonSchemaValidator::new().with_format(CustomFormat::slug());
        let schema = json!({ "type": "string", "format": "slug" });

        assert!(validator.validate(&json!("frank-64"), &schema).await.is_ok());
        let err = validator.validate(&json!("Frank"), &schema).await.unwrap_err();
        assert_eq!(err.violations().unwrap().codes(), vec!["INVALID_FORMAT"]);
    }
}
