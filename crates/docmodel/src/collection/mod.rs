//! Collection contract
//!
//! The traits the model layer talks to. A collection is a named set of
//! documents in an external store; a database hands out collections by name.
//! Backends report failures as [`StoreError`], which the model layer passes
//! through unchanged.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::document::Document;
use crate::options::{FindOptions, WriteOptions};

pub mod memory;
pub mod query;

pub use memory::{CollectionStats, MemoryCollection, MemoryDatabase};

/// Errors reported by a collection backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("E11000 duplicate key error collection: {collection} dup key: {{ _id: {key} }}")]
    DuplicateKey { collection: String, key: String },

    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    #[error("Write concern error: {0}")]
    WriteConcern(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for collection operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a single-document insert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertOneResult {
    pub inserted_id: Value,
    /// The document as stored
    pub document: Document,
}

/// Outcome of a batch insert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertManyResult {
    pub inserted_ids: Vec<Value>,
    pub inserted_count: u64,
    /// The documents as stored, in input order
    pub documents: Vec<Document>,
}

/// Outcome of an update or replace
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Value>,
    /// The stored document after a replace
    pub document: Option<Document>,
}

/// Outcome of a delete
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Documents returned by a find, consumed in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cursor {
    documents: VecDeque<Document>,
}

impl Cursor {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: documents.into(),
        }
    }

    /// Drop the first `n` documents
    pub fn skip(mut self, n: usize) -> Self {
        let n = n.min(self.documents.len());
        self.documents.drain(..n);
        self
    }

    /// Keep at most `n` documents
    pub fn limit(mut self, n: usize) -> Self {
        self.documents.truncate(n);
        self
    }

    /// Next document, if any
    pub fn next(&mut self) -> Option<Document> {
        self.documents.pop_front()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Remaining documents
    pub fn to_vec(self) -> Vec<Document> {
        self.documents.into()
    }
}

impl IntoIterator for Cursor {
    type Item = Document;
    type IntoIter = std::collections::vec_deque::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

/// A handle to a named collection in a document store
#[async_trait]
pub trait Collection: Send + Sync {
    /// Collection name
    fn name(&self) -> &str;

    /// Insert one document
    async fn insert_one(&self, document: Document, options: &WriteOptions) -> StoreResult<InsertOneResult>;

    /// Insert a batch of documents in one call
    async fn insert_many(&self, documents: Vec<Document>, options: &WriteOptions) -> StoreResult<InsertManyResult>;

    /// Find documents matching `filter`, applying projection, skip and limit
    async fn find(&self, filter: &Document, options: &FindOptions) -> StoreResult<Cursor>;

    /// Apply `update` to the first document matching `filter`
    async fn update_one(&self, filter: &Document, update: &Document, options: &WriteOptions) -> StoreResult<UpdateResult>;

    /// Replace the first document matching `filter`
    async fn replace_one(&self, filter: &Document, replacement: Document, options: &WriteOptions) -> StoreResult<UpdateResult>;

    /// Delete the first document matching `filter`
    async fn delete_one(&self, filter: &Document, options: &WriteOptions) -> StoreResult<DeleteResult>;

    /// Delete every document matching `filter`
    async fn delete_many(&self, filter: &Document, options: &WriteOptions) -> StoreResult<DeleteResult>;

    /// Count documents matching `filter`
    async fn count(&self, filter: &Document) -> StoreResult<u64>;

    /// Distinct values at `field` among documents matching `filter`
    async fn distinct(&self, field: &str, filter: &Document) -> StoreResult<Vec<Value>>;
}

/// A document store that hands out collections by name
pub trait Database: Send + Sync {
    fn collection(&self, name: &str) -> Arc<dyn Collection>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbered(n: i64) -> Vec<Document> {
        (0..n)
            .map(|i| json!({ "n": i }).as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_cursor_skip_and_limit() {
        let mut cursor = Cursor::new(numbered(5)).skip(1).limit(2);
        assert_eq!(cursor.len(), 2);
        assert_eq!(cursor.next().unwrap()["n"], json!(1));
        assert_eq!(cursor.next().unwrap()["n"], json!(2));
        assert!(cursor.next().is_none());
    }

    #[test]
    fn test_cursor_skip_past_end() {
        let cursor = Cursor::new(numbered(2)).skip(5);
        assert!(cursor.is_empty());
        assert!(cursor.to_vec().is_empty());
    }

    #[test]
    fn test_duplicate_key_message() {
        let err = StoreError::DuplicateKey {
            collection: "entity".into(),
            key: "\"1\"".into(),
        };
        assert_eq!(
            err.to_string(),
            "E11000 duplicate key error collection: entity dup key: { _id: \"1\" }"
        );
    }
}
