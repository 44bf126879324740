//! Model System - model types, their instances and the operations on them
//!
//! - `identifier`: identifier derivation from declared field paths
//! - `model_type`: the model type handle and its instances
//! - `write_operations`: validation-gated single and batch inserts
//! - `crud_operations`: instance-scoped find, update, replace and delete
//! - `query_methods`: type-scoped find, count, distinct and delete

pub mod crud_operations;
pub mod identifier;
pub mod model_type;
pub mod query_methods;
pub mod write_operations;

pub use identifier::{derive_identifier, try_derive_identifier, ID_DIVIDER, ID_FIELD};
pub use model_type::{ModelInstance, ModelType};
