//! Query Methods - type-scoped operations over the model's collection

use serde_json::Value;

use crate::collection::DeleteResult;
use crate::document::Document;
use crate::error::ModelResult;
use crate::model::model_type::{ModelInstance, ModelType};
use crate::options::{FindOptions, WriteOptions};

impl ModelType {
    /// All documents matching `filter`
    pub async fn find(&self, filter: &Document, options: &FindOptions) -> ModelResult<Vec<Document>> {
        let collection = self.require_collection()?;
        let cursor = collection.find(filter, options).await?;
        Ok(cursor.to_vec())
    }

    /// Matching documents bound to this model type
    pub async fn find_instances(&self, filter: &Document, options: &FindOptions) -> ModelResult<Vec<ModelInstance>> {
        let documents = self.find(filter, options).await?;
        Ok(documents.into_iter().map(|document| self.instance(document)).collect())
    }

    pub async fn count(&self, filter: &Document) -> ModelResult<u64> {
        let collection = self.require_collection()?;
        Ok(collection.count(filter).await?)
    }

    /// Unique values at `field` among matching documents
    pub async fn distinct(&self, field: &str, filter: &Document) -> ModelResult<Vec<Value>> {
        let collection = self.require_collection()?;
        Ok(collection.distinct(field, filter).await?)
    }

    pub async fn delete_many(&self, filter: &Document, options: &WriteOptions) -> ModelResult<DeleteResult> {
        let collection = self.require_collection()?;
        tracing::debug!("deleting matching documents from collection {}", collection.name());
        Ok(collection.delete_many(filter, options).await?)
    }
}
