//! CRUD Operations - instance-scoped find, update, replace and delete
//!
//! Every call is keyed on the instance's existing `_id`. The identifier is
//! never re-derived here, so editing a rid field does not move the document.

use serde_json::Value;

use crate::collection::{DeleteResult, UpdateResult};
use crate::document::Document;
use crate::error::ModelResult;
use crate::model::identifier::ID_FIELD;
use crate::model::model_type::ModelInstance;
use crate::options::{FindOptions, WriteOptions};

impl ModelInstance {
    /// Fetch the stored document with this instance's `_id`
    pub async fn find_one(&self, options: &FindOptions) -> ModelResult<Option<Document>> {
        let collection = self.model.require_collection()?;
        let filter = Self::id_filter(self.require_id()?);

        let mut cursor = collection.find(&filter, options).await?.limit(1);
        Ok(cursor.next())
    }

    /// Write every field except `_id` onto the stored document with `$set`
    pub async fn update_one(&self, options: &WriteOptions) -> ModelResult<UpdateResult> {
        let fields: Document = self
            .document
            .iter()
            .filter(|(key, _)| key.as_str() != ID_FIELD)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut update = Document::new();
        update.insert("$set".to_string(), Value::Object(fields));
        self.update_one_with(&update, options).await
    }

    /// Apply a caller-supplied update document to the stored document
    pub async fn update_one_with(&self, update: &Document, options: &WriteOptions) -> ModelResult<UpdateResult> {
        let collection = self.model.require_collection()?;
        let filter = Self::id_filter(self.require_id()?);

        tracing::debug!("updating {} in collection {}", filter[ID_FIELD], collection.name());
        Ok(collection.update_one(&filter, update, options).await?)
    }

    /// Validate this instance and replace the stored document with it.
    ///
    /// Validation runs before the `_id` is looked at, so an invalid instance
    /// reports its violations even when it has no identifier.
    pub async fn replace_one(&self, options: &WriteOptions) -> ModelResult<UpdateResult> {
        let (validator, schema) = self.model.require_validator()?;
        let collection = self.model.require_collection()?;

        let candidate = Value::Object(self.document.clone());
        if let Err(err) = validator.validate(&candidate, schema).await {
            tracing::debug!("validation failed for model {}: {}", self.model.name(), err);
            return Err(err.into());
        }
        let filter = Self::id_filter(self.require_id()?);

        tracing::debug!("replacing {} in collection {}", filter[ID_FIELD], collection.name());
        Ok(collection.replace_one(&filter, self.document.clone(), options).await?)
    }

    /// Delete the stored document with this instance's `_id`
    pub async fn delete_one(&self, options: &WriteOptions) -> ModelResult<DeleteResult> {
        let collection = self.model.require_collection()?;
        let filter = Self::id_filter(self.require_id()?);

        tracing::debug!("deleting {} from collection {}", filter[ID_FIELD], collection.name());
        Ok(collection.delete_one(&filter, options).await?)
    }
}
