//! Model schema: meta section plus a JSON Schema for documents

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelResult;

/// Descriptive section of a model schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaSchema {
    pub name: String,
    /// Name of the backing collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Field paths the identifier is derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rids: Option<Vec<String>>,
}

impl MetaSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            description: None,
            kind: None,
            json_schema: None,
            version: None,
            rids: None,
        }
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn rids<I, S>(mut self, rids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rids = Some(rids.into_iter().map(Into::into).collect());
        self
    }
}

/// A model schema as stored alongside the model definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSchema {
    pub meta_schema: MetaSchema,
    pub schema: Value,
}

impl ModelSchema {
    pub fn new(meta_schema: MetaSchema, schema: Value) -> Self {
        Self { meta_schema, schema }
    }

    pub fn from_value(value: Value) -> ModelResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(text: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Collection backing the model: `base`, or `name` when no base is set
    pub fn collection_name(&self) -> &str {
        self.meta_schema.base.as_deref().unwrap_or(&self.meta_schema.name)
    }

    pub fn rids(&self) -> Option<&[String]> {
        self.meta_schema.rids.as_deref()
    }
}
