//! Write Operations - validation-gated inserts
//!
//! `save` writes one instance and `insert_many` a batch. Both derive the
//! identifier from the configured rids, validate, and only then forward to
//! the collection. Nothing reaches the collection when derivation or
//! validation fails.

use docmodel_validation::{ValidationError, Violations};
use futures::future::join_all;
use serde_json::Value;

use crate::collection::{InsertManyResult, InsertOneResult};
use crate::document::Document;
use crate::error::{ModelError, ModelResult};
use crate::model::identifier::{try_derive_identifier, ID_FIELD};
use crate::model::model_type::{ModelInstance, ModelType};
use crate::options::WriteOptions;

impl ModelInstance {
    /// Derive the identifier, validate and insert this instance.
    ///
    /// A derived identifier replaces any `_id` already present. On success
    /// the instance holds the document as stored, including an identifier
    /// assigned by the store.
    pub async fn save(&mut self, options: &WriteOptions) -> ModelResult<InsertOneResult> {
        let model = self.model.clone();
        let (validator, schema) = model.require_validator()?;
        let collection = model.require_collection()?;

        if let Some(rids) = model.config().rids() {
            let id = try_derive_identifier(&self.document, rids).ok_or_else(|| ModelError::CannotCreateId {
                model: model.name().to_string(),
            })?;
            tracing::debug!("derived id {} for model {}", id, model.name());
            self.document.insert(ID_FIELD.to_string(), Value::String(id));
        }

        let candidate = Value::Object(self.document.clone());
        if let Err(err) = validator.validate(&candidate, schema).await {
            tracing::debug!("validation failed for model {}: {}", model.name(), err);
            return Err(err.into());
        }

        tracing::debug!("inserting document into collection {}", collection.name());
        let result = collection.insert_one(self.document.clone(), options).await?;
        self.document = result.document.clone();
        Ok(result)
    }
}

impl ModelType {
    /// Derive identifiers for, validate and insert a batch of documents.
    ///
    /// Identifier derivation and validation happen for the whole batch before
    /// anything is written: a single failure leaves the collection untouched.
    /// Validation runs for every document concurrently and all outcomes are
    /// awaited. Violation lists of all rejected documents are merged in
    /// document order; a validator failure that is not a violation list is
    /// returned as is.
    pub async fn insert_many(&self, documents: Vec<Document>, options: &WriteOptions) -> ModelResult<InsertManyResult> {
        let collection = self.require_collection()?;
        let (validator, schema) = self.require_validator()?;

        let mut documents = documents;
        if let Some(rids) = self.config().rids() {
            for document in documents.iter_mut() {
                let id = try_derive_identifier(document, rids).ok_or_else(|| ModelError::CannotCreateIds {
                    model: self.name().to_string(),
                    rids: rids.to_vec(),
                })?;
                document.insert(ID_FIELD.to_string(), Value::String(id));
            }
            tracing::debug!("derived {} ids for model {}", documents.len(), self.name());
        }

        let candidates: Vec<Value> = documents.iter().cloned().map(Value::Object).collect();
        let outcomes = join_all(candidates.iter().map(|candidate| validator.validate(candidate, schema))).await;

        // Any error rejects the batch, even a violation list that is empty
        let mut rejected = false;
        let mut violations = Violations::new();
        let mut failure: Option<ValidationError> = None;
        for outcome in outcomes {
            match outcome {
                Ok(()) => {}
                Err(ValidationError::Violations(found)) => {
                    rejected = true;
                    violations.merge(found);
                }
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        }
        if let Some(err) = failure {
            tracing::debug!("validator failed for model {}: {}", self.name(), err);
            return Err(err.into());
        }
        if rejected {
            tracing::debug!("batch for model {} rejected with {} violations", self.name(), violations.len());
            return Err(ValidationError::Violations(violations).into());
        }

        tracing::debug!("inserting {} documents into collection {}", documents.len(), collection.name());
        Ok(collection.insert_many(documents, options).await?)
    }
}
