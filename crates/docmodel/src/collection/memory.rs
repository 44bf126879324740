//! In-memory collection backend
//!
//! Keeps documents in insertion order behind a lock. Used as the reference
//! store in tests and for embedding without an external database.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use crate::collection::query::{apply_update, matches, project, upsert_seed};
use crate::collection::{
    Collection, Cursor, Database, DeleteResult, InsertManyResult, InsertOneResult, StoreError, StoreResult,
    UpdateResult,
};
use crate::document::{reach, Document};
use crate::model::identifier::ID_FIELD;
use crate::options::{FindOptions, WriteConcern, WriteOptions};

/// Per-operation call counters
#[derive(Debug, Default)]
struct Counters {
    inserts: AtomicU64,
    updates: AtomicU64,
    replaces: AtomicU64,
    deletes: AtomicU64,
    finds: AtomicU64,
    counts: AtomicU64,
    distincts: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of how a collection has been used
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub insert_calls: u64,
    pub update_calls: u64,
    pub replace_calls: u64,
    pub delete_calls: u64,
    pub find_calls: u64,
    pub count_calls: u64,
    pub distinct_calls: u64,
    pub documents: u64,
}

impl CollectionStats {
    /// Calls that could have modified the collection
    pub fn write_calls(&self) -> u64 {
        self.insert_calls + self.update_calls + self.replace_calls + self.delete_calls
    }
}

/// A collection held in process memory
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    documents: RwLock<Vec<Document>>,
    counters: Counters,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
            counters: Counters::default(),
        }
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Copy of every stored document, in insertion order
    pub fn documents(&self) -> Vec<Document> {
        self.documents.read().clone()
    }

    /// Stored document with the given `_id`
    pub fn get(&self, id: &Value) -> Option<Document> {
        self.documents
            .read()
            .iter()
            .find(|document| document.get(ID_FIELD) == Some(id))
            .cloned()
    }

    /// Remove every document; call counters are kept
    pub fn clear(&self) {
        self.documents.write().clear();
    }

    pub fn stats(&self) -> CollectionStats {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        CollectionStats {
            insert_calls: load(&self.counters.inserts),
            update_calls: load(&self.counters.updates),
            replace_calls: load(&self.counters.replaces),
            delete_calls: load(&self.counters.deletes),
            find_calls: load(&self.counters.finds),
            count_calls: load(&self.counters.counts),
            distinct_calls: load(&self.counters.distincts),
            documents: self.len() as u64,
        }
    }

    /// A single in-process node cannot acknowledge on more than one node
    fn check_write_concern(options: &WriteOptions) -> StoreResult<()> {
        match options.write_concern {
            Some(WriteConcern::Nodes(nodes)) if nodes > 1 => Err(StoreError::WriteConcern(format!(
                "cannot satisfy w:{} with a single node",
                nodes
            ))),
            _ => Ok(()),
        }
    }

    fn ensure_id(document: &mut Document) -> Value {
        document
            .entry(ID_FIELD)
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()))
            .clone()
    }

    fn duplicate(&self, id: &Value) -> StoreError {
        StoreError::DuplicateKey {
            collection: self.name.clone(),
            key: id.to_string(),
        }
    }

    fn contains_id(documents: &[Document], id: &Value) -> bool {
        documents.iter().any(|document| document.get(ID_FIELD) == Some(id))
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, mut document: Document, options: &WriteOptions) -> StoreResult<InsertOneResult> {
        Counters::bump(&self.counters.inserts);
        Self::check_write_concern(options)?;

        let id = Self::ensure_id(&mut document);
        let mut documents = self.documents.write();
        if Self::contains_id(&documents, &id) {
            return Err(self.duplicate(&id));
        }
        documents.push(document.clone());
        tracing::trace!("inserted document {} into {}", id, self.name);

        Ok(InsertOneResult {
            inserted_id: id,
            document,
        })
    }

    async fn insert_many(&self, mut batch: Vec<Document>, options: &WriteOptions) -> StoreResult<InsertManyResult> {
        Counters::bump(&self.counters.inserts);
        Self::check_write_concern(options)?;

        let ids: Vec<Value> = batch.iter_mut().map(Self::ensure_id).collect();
        let mut documents = self.documents.write();

        // Nothing is written unless the whole batch fits
        for (index, id) in ids.iter().enumerate() {
            if Self::contains_id(&documents, id) || ids[..index].contains(id) {
                return Err(self.duplicate(id));
            }
        }
        documents.extend(batch.iter().cloned());
        tracing::trace!("inserted {} documents into {}", ids.len(), self.name);

        Ok(InsertManyResult {
            inserted_count: ids.len() as u64,
            inserted_ids: ids,
            documents: batch,
        })
    }

    async fn find(&self, filter: &Document, options: &FindOptions) -> StoreResult<Cursor> {
        Counters::bump(&self.counters.finds);

        let documents = self.documents.read();
        let matched = documents
            .iter()
            .filter(|document| matches(document, filter))
            .skip(options.skip.unwrap_or(0))
            .take(options.limit.unwrap_or(usize::MAX));

        let found = match &options.projection {
            Some(projection) => matched
                .map(|document| project(document, projection))
                .collect::<StoreResult<Vec<_>>>()?,
            None => matched.cloned().collect(),
        };
        Ok(Cursor::new(found))
    }

    async fn update_one(&self, filter: &Document, update: &Document, options: &WriteOptions) -> StoreResult<UpdateResult> {
        Counters::bump(&self.counters.updates);
        Self::check_write_concern(options)?;

        let mut documents = self.documents.write();
        if let Some(position) = documents.iter().position(|document| matches(document, filter)) {
            let mut updated = documents[position].clone();
            let modified = apply_update(&mut updated, update)?;
            if modified {
                documents[position] = updated;
            }
            return Ok(UpdateResult {
                matched_count: 1,
                modified_count: u64::from(modified),
                ..UpdateResult::default()
            });
        }

        if !options.upsert {
            return Ok(UpdateResult::default());
        }

        let mut seeded = upsert_seed(filter);
        apply_update(&mut seeded, update)?;
        let id = Self::ensure_id(&mut seeded);
        if Self::contains_id(&documents, &id) {
            return Err(self.duplicate(&id));
        }
        documents.push(seeded);
        tracing::trace!("upserted document {} into {}", id, self.name);

        Ok(UpdateResult {
            upserted_id: Some(id),
            ..UpdateResult::default()
        })
    }

    async fn replace_one(
        &self,
        filter: &Document,
        mut replacement: Document,
        options: &WriteOptions,
    ) -> StoreResult<UpdateResult> {
        Counters::bump(&self.counters.replaces);
        Self::check_write_concern(options)?;

        if replacement.keys().any(|key| key.starts_with('$')) {
            return Err(StoreError::InvalidUpdate(
                "replacement document must not contain update operators".to_string(),
            ));
        }

        let mut documents = self.documents.write();
        if let Some(position) = documents.iter().position(|document| matches(document, filter)) {
            let existing_id = documents[position].get(ID_FIELD).cloned().unwrap_or(Value::Null);
            match replacement.get(ID_FIELD) {
                Some(id) if *id != existing_id => {
                    return Err(StoreError::InvalidUpdate(
                        "the _id field cannot be changed by a replacement".to_string(),
                    ));
                }
                _ => {
                    replacement.insert(ID_FIELD.to_string(), existing_id);
                }
            }

            let modified = documents[position] != replacement;
            documents[position] = replacement.clone();
            return Ok(UpdateResult {
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_id: None,
                document: Some(replacement),
            });
        }

        if !options.upsert {
            return Ok(UpdateResult::default());
        }

        if let (Some(id), false) = (filter.get(ID_FIELD), replacement.contains_key(ID_FIELD)) {
            replacement.insert(ID_FIELD.to_string(), id.clone());
        }
        let id = Self::ensure_id(&mut replacement);
        if Self::contains_id(&documents, &id) {
            return Err(self.duplicate(&id));
        }
        documents.push(replacement.clone());

        Ok(UpdateResult {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
            document: Some(replacement),
        })
    }

    async fn delete_one(&self, filter: &Document, options: &WriteOptions) -> StoreResult<DeleteResult> {
        Counters::bump(&self.counters.deletes);
        Self::check_write_concern(options)?;

        let mut documents = self.documents.write();
        let deleted_count = match documents.iter().position(|document| matches(document, filter)) {
            Some(position) => {
                documents.remove(position);
                1
            }
            None => 0,
        };
        Ok(DeleteResult { deleted_count })
    }

    async fn delete_many(&self, filter: &Document, options: &WriteOptions) -> StoreResult<DeleteResult> {
        Counters::bump(&self.counters.deletes);
        Self::check_write_concern(options)?;

        let mut documents = self.documents.write();
        let before = documents.len();
        documents.retain(|document| !matches(document, filter));
        Ok(DeleteResult {
            deleted_count: (before - documents.len()) as u64,
        })
    }

    async fn count(&self, filter: &Document) -> StoreResult<u64> {
        Counters::bump(&self.counters.counts);

        let documents = self.documents.read();
        Ok(documents.iter().filter(|document| matches(document, filter)).count() as u64)
    }

    async fn distinct(&self, field: &str, filter: &Document) -> StoreResult<Vec<Value>> {
        Counters::bump(&self.counters.distincts);

        let documents = self.documents.read();
        let mut values: Vec<Value> = Vec::new();
        for document in documents.iter().filter(|document| matches(document, filter)) {
            let found: Vec<&Value> = match reach(document, field) {
                Some(Value::Array(items)) => items.iter().collect(),
                Some(value) => vec![value],
                None => Vec::new(),
            };
            for value in found {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        }
        Ok(values)
    }
}

/// A set of in-memory collections, created on first use
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    collections: DashMap<String, Arc<MemoryCollection>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// The concrete collection with the given name
    pub fn memory_collection(&self, name: &str) -> Arc<MemoryCollection> {
        self.collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCollection::new(name)))
            .clone()
    }

    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn drop_collection(&self, name: &str) -> bool {
        self.collections.remove(name).is_some()
    }
}

impl Database for MemoryDatabase {
    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        self.memory_collection(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn filter(value: Value) -> Document {
        doc(value)
    }

    #[tokio::test]
    async fn test_insert_generates_missing_id() {
        let collection = MemoryCollection::new("entity");
        let result = collection
            .insert_one(doc(json!({ "name": "Amy" })), &WriteOptions::default())
            .await
            .unwrap();

        assert!(result.inserted_id.as_str().map_or(false, |id| !id.is_empty()));
        assert_eq!(result.document["_id"], result.inserted_id);
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let collection = MemoryCollection::new("entity");
        let options = WriteOptions::default();
        collection.insert_one(doc(json!({ "_id": "1" })), &options).await.unwrap();

        let err = collection.insert_one(doc(json!({ "_id": "1" })), &options).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_many_is_all_or_nothing() {
        let collection = MemoryCollection::new("entity");
        let options = WriteOptions::default();
        collection.insert_one(doc(json!({ "_id": "2" })), &options).await.unwrap();

        let batch = vec![doc(json!({ "_id": "1" })), doc(json!({ "_id": "2" })), doc(json!({ "_id": "3" }))];
        assert!(collection.insert_many(batch, &options).await.is_err());
        assert_eq!(collection.len(), 1);

        let batch = vec![doc(json!({ "_id": "4" })), doc(json!({ "_id": "4" }))];
        assert!(collection.insert_many(batch, &options).await.is_err());

        let batch = vec![doc(json!({ "_id": "5" })), doc(json!({ "_id": "6" }))];
        let result = collection.insert_many(batch, &options).await.unwrap();
        assert_eq!(result.inserted_count, 2);
        assert_eq!(result.inserted_ids, vec![json!("5"), json!("6")]);
        assert_eq!(collection.len(), 3);
    }

    #[tokio::test]
    async fn test_find_with_projection_and_limit() {
        let collection = MemoryCollection::new("entity");
        let options = WriteOptions::default();
        for (id, name) in [("1", "John"), ("2", "Amy"), ("3", "John")] {
            collection
                .insert_one(doc(json!({ "_id": id, "person": { "name": name, "age": 30 } })), &options)
                .await
                .unwrap();
        }

        let found = collection
            .find(
                &filter(json!({ "person.name": "John" })),
                &FindOptions::new().projection(doc(json!({ "person.age": 0 }))),
            )
            .await
            .unwrap()
            .to_vec();
        assert_eq!(found.len(), 2);
        assert!(found[0]["person"].get("age").is_none());

        let mut cursor = collection
            .find(&Document::new(), &FindOptions::new().skip(1).limit(1))
            .await
            .unwrap();
        assert_eq!(cursor.next().unwrap()["_id"], json!("2"));
        assert!(cursor.next().is_none());
    }

    #[tokio::test]
    async fn test_update_and_upsert() {
        let collection = MemoryCollection::new("entity");
        collection
            .insert_one(doc(json!({ "_id": "1", "age": 35 })), &WriteOptions::default())
            .await
            .unwrap();

        let set_age = doc(json!({ "$set": { "age": 105 } }));
        let result = collection
            .update_one(&filter(json!({ "_id": "1" })), &set_age, &WriteOptions::default())
            .await
            .unwrap();
        assert_eq!((result.matched_count, result.modified_count), (1, 1));

        let result = collection
            .update_one(&filter(json!({ "_id": "9" })), &set_age, &WriteOptions::default())
            .await
            .unwrap();
        assert_eq!(result, UpdateResult::default());

        let result = collection
            .update_one(&filter(json!({ "_id": "9" })), &set_age, &WriteOptions::new().upsert(true))
            .await
            .unwrap();
        assert_eq!(result.upserted_id, Some(json!("9")));
        assert_eq!(collection.get(&json!("9")).unwrap()["age"], json!(105));
    }

    #[tokio::test]
    async fn test_replace_keeps_id() {
        let collection = MemoryCollection::new("entity");
        collection
            .insert_one(doc(json!({ "_id": "1", "name": "Frank" })), &WriteOptions::default())
            .await
            .unwrap();

        let result = collection
            .replace_one(
                &filter(json!({ "_id": "1" })),
                doc(json!({ "name": "Fred" })),
                &WriteOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.modified_count, 1);
        assert_eq!(result.document.unwrap()["_id"], json!("1"));

        let err = collection
            .replace_one(
                &filter(json!({ "_id": "1" })),
                doc(json!({ "_id": "2", "name": "Fred" })),
                &WriteOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidUpdate(_)));

        let err = collection
            .replace_one(
                &filter(json!({ "_id": "1" })),
                doc(json!({ "$set": { "name": "Fred" } })),
                &WriteOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidUpdate(_)));
    }

    #[tokio::test]
    async fn test_delete_count_distinct() {
        let collection = MemoryCollection::new("entity");
        let options = WriteOptions::default();
        for (id, name) in [("1", "John"), ("2", "Amy"), ("3", "John")] {
            collection
                .insert_one(doc(json!({ "_id": id, "person": { "name": name } })), &options)
                .await
                .unwrap();
        }

        assert_eq!(collection.count(&Document::new()).await.unwrap(), 3);
        assert_eq!(
            collection.distinct("person.name", &Document::new()).await.unwrap(),
            vec![json!("John"), json!("Amy")]
        );

        let deleted = collection.delete_one(&filter(json!({ "_id": "2" })), &options).await.unwrap();
        assert_eq!(deleted.deleted_count, 1);
        let deleted = collection
            .delete_many(&filter(json!({ "person.name": "John" })), &options)
            .await
            .unwrap();
        assert_eq!(deleted.deleted_count, 2);
        assert!(collection.is_empty());
    }

    #[tokio::test]
    async fn test_unsatisfiable_write_concern() {
        let collection = MemoryCollection::new("entity");
        let options = WriteOptions::new().write_concern(WriteConcern::Nodes(3));

        let err = collection.insert_one(doc(json!({ "_id": "1" })), &options).await.unwrap_err();
        assert!(matches!(err, StoreError::WriteConcern(_)));
        assert!(collection.is_empty());
        assert_eq!(collection.stats().insert_calls, 1);
    }

    #[test]
    fn test_database_reuses_collections() {
        let database = MemoryDatabase::new();
        let first = database.memory_collection("entity");
        let second = database.collection("entity");

        assert_eq!(second.name(), "entity");
        assert!(Arc::ptr_eq(&first, &database.memory_collection("entity")));
        assert_eq!(database.collection_names(), vec!["entity".to_string()]);
        assert!(database.drop_collection("entity"));
        assert!(database.collection_names().is_empty());
    }
}
