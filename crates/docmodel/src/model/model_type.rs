//! Model type handle and model instances

use std::sync::Arc;

use docmodel_validation::Validator;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::collection::Collection;
use crate::config::ModelConfig;
use crate::document::{from_document, reach, set_path, to_document, Document};
use crate::error::{ModelError, ModelResult};
use crate::model::identifier::ID_FIELD;

/// A configured model type
///
/// Cheap to clone; every clone shares the same configuration.
#[derive(Debug, Clone)]
pub struct ModelType {
    config: Arc<ModelConfig>,
}

impl ModelType {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// New instance holding `document`
    pub fn instance(&self, document: Document) -> ModelInstance {
        ModelInstance {
            model: self.clone(),
            document,
        }
    }

    /// New instance with no fields
    pub fn empty(&self) -> ModelInstance {
        self.instance(Document::new())
    }

    /// New instance from any value serializing to a JSON object
    pub fn instance_from<T: Serialize + ?Sized>(&self, value: &T) -> ModelResult<ModelInstance> {
        Ok(self.instance(to_document(value)?))
    }

    pub(crate) fn require_collection(&self) -> ModelResult<&Arc<dyn Collection>> {
        self.config.collection().ok_or_else(|| ModelError::NoDb {
            model: self.name().to_string(),
        })
    }

    /// The validator together with the schema it validates against
    pub(crate) fn require_validator(&self) -> ModelResult<(&Arc<dyn Validator>, &Value)> {
        let no_validation = || ModelError::NoValidation {
            model: self.name().to_string(),
        };
        let validator = self.config.validator().ok_or_else(no_validation)?;
        let schema = self.config.schema().ok_or_else(no_validation)?;
        Ok((validator, &schema.schema))
    }
}

/// A document bound to its model type
#[derive(Debug, Clone)]
pub struct ModelInstance {
    pub(crate) model: ModelType,
    pub(crate) document: Document,
}

impl ModelInstance {
    pub fn model(&self) -> &ModelType {
        &self.model
    }

    /// The identifier, once derived, supplied or assigned by the store
    pub fn id(&self) -> Option<&Value> {
        self.document.get(ID_FIELD)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Value at a dot path
    pub fn get(&self, path: &str) -> Option<&Value> {
        reach(&self.document, path)
    }

    /// Set the value at a dot path; `false` when an intermediate field is
    /// not an object
    pub fn set(&mut self, path: &str, value: Value) -> bool {
        set_path(&mut self.document, path, value)
    }

    /// Deserialize the document into a typed value
    pub fn decode<T: DeserializeOwned>(&self) -> ModelResult<T> {
        from_document(self.document.clone())
    }

    pub(crate) fn require_id(&self) -> ModelResult<Value> {
        self.id().cloned().ok_or_else(|| ModelError::MissingIdentifier {
            model: self.model.name().to_string(),
        })
    }

    pub(crate) fn id_filter(id: Value) -> Document {
        let mut filter = Document::new();
        filter.insert(ID_FIELD.to_string(), id);
        filter
    }
}
