//! Error types for model operations
//!
//! Configuration errors are raised before any I/O. Validation and store
//! errors carry the collaborator's error unchanged.

use docmodel_validation::{ValidationError, Violations};
use thiserror::Error;

use crate::collection::StoreError;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for model operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// No collection registered on the model type
    #[error("No db assigned to model class: {model}")]
    NoDb { model: String },

    /// No validator registered on the model type
    #[error("No validation assigned to model class: {model}")]
    NoValidation { model: String },

    /// The declared rids produced no identifier for a document
    #[error("Cannot create id for model class: {model}")]
    CannotCreateId { model: String },

    /// The declared rids produced no identifier for a document of a batch
    #[error("Cannot create ids for model class {model} from rids [{}]", .rids.join(", "))]
    CannotCreateIds { model: String, rids: Vec<String> },

    /// An instance-scoped operation was called on an instance without `_id`
    #[error("Instance of model class {model} has no _id")]
    MissingIdentifier { model: String },

    /// The validator rejected the document(s)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The collection rejected the operation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid model configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Converting between typed values and documents failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ModelError {
    /// Violation list of a list-shaped validation error
    pub fn details(&self) -> Option<&Violations> {
        match self {
            ModelError::Validation(err) => err.violations(),
            _ => None,
        }
    }

    /// The rid list that failed identifier derivation in a batch
    pub fn rids(&self) -> Option<&[String]> {
        match self {
            ModelError::CannotCreateIds { rids, .. } => Some(rids),
            _ => None,
        }
    }

    /// Name of the model type the error was raised for, when known
    pub fn model(&self) -> Option<&str> {
        match self {
            ModelError::NoDb { model }
            | ModelError::NoValidation { model }
            | ModelError::CannotCreateId { model }
            | ModelError::CannotCreateIds { model, .. }
            | ModelError::MissingIdentifier { model } => Some(model),
            _ => None,
        }
    }

    /// Raised locally because the model type lacks a collaborator or is misconfigured
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ModelError::NoDb { .. } | ModelError::NoValidation { .. } | ModelError::Configuration(_)
        )
    }

    /// Identifier derivation failed
    pub fn is_derivation(&self) -> bool {
        matches!(self, ModelError::CannotCreateId { .. } | ModelError::CannotCreateIds { .. })
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmodel_validation::Violation;

    #[test]
    fn test_configuration_messages_name_the_model() {
        let err = ModelError::NoDb { model: "User".into() };
        assert_eq!(err.to_string(), "No db assigned to model class: User");
        assert!(err.is_configuration());
        assert_eq!(err.model(), Some("User"));

        let err = ModelError::NoValidation { model: "User".into() };
        assert_eq!(err.to_string(), "No validation assigned to model class: User");
    }

    #[test]
    fn test_batch_derivation_error_lists_rids() {
        let err = ModelError::CannotCreateIds {
            model: "User".into(),
            rids: vec!["name".into(), "age".into()],
        };
        assert_eq!(err.to_string(), "Cannot create ids for model class User from rids [name, age]");
        assert_eq!(err.rids(), Some(&["name".to_string(), "age".to_string()][..]));
        assert!(err.is_derivation());
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_validation_details_only_for_lists() {
        let err: ModelError = ValidationError::from(Violation::new("INVALID_TYPE", "#/person/age", "bad")).into();
        assert_eq!(err.details().map(|d| d.codes()), Some(vec!["INVALID_TYPE"]));

        let err: ModelError = ValidationError::Validator("broken schema".into()).into();
        assert!(err.details().is_none());
        assert_eq!(err.to_string(), "Validator error: broken schema");
    }

    #[test]
    fn test_store_errors_are_transparent() {
        let err: ModelError = StoreError::Backend("connection reset".into()).into();
        assert_eq!(err.to_string(), "Backend error: connection reset");
    }
}
