//! # docmodel: CRUD for document models
//!
//! Adds insert, find, update, replace, delete, count and distinct to a model
//! type by delegating to a document collection. New documents can get a
//! deterministic identifier derived from declared field paths ("rids"), and
//! every insert or replace is validated before it reaches the collection.
//!
//! ```rust
//! use std::sync::Arc;
//! use docmodel::{MemoryDatabase, MetaSchema, ModelConfig, ModelSchema, ModelType, WriteOptions};
//! use docmodel_validation::JsonSchemaValidator;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let schema = ModelSchema::new(
//!     MetaSchema::new("user").base("entity").rids(["name"]),
//!     json!({ "type": "object", "required": ["name"] }),
//! );
//! let users = ModelType::new(
//!     ModelConfig::builder("User")
//!         .schema(schema)
//!         .validator(Arc::new(JsonSchemaValidator::new()))
//!         .database(Arc::new(MemoryDatabase::new()))
//!         .build()
//!         .unwrap(),
//! );
//!
//! // The identifier is derived from the `name` field
//! let mut sam = users.instance_from(&json!({ "name": " Sam " })).unwrap();
//! sam.save(&WriteOptions::default()).await.unwrap();
//! assert_eq!(sam.id(), Some(&json!("sam")));
//! assert_eq!(users.count(&Default::default()).await.unwrap(), 1);
//! # });
//! ```

pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod options;
pub mod schema;


pub use collection::*;
pub use config::*;
pub use document::*;
pub use error::*;
pub use model::*;
pub use options::*;
pub use schema::*;
