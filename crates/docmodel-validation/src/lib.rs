//! # docmodel-validation
//!
//! Document validation for docmodel: the [`Validator`] contract consumed by
//! the write pipeline, and [`JsonSchemaValidator`], a JSON Schema (draft 4
//! subset) implementation that reports structured violations such as
//! `INVALID_TYPE` or `INVALID_FORMAT` together with the JSON pointer of the
//! offending value.

pub mod error;
pub mod keywords;
pub mod traits;
pub mod validator;

pub use error::{ValidationError, ValidationResult, Violation, Violations};
pub use keywords::{CustomFormat, EmailFormat};
pub use traits::{Keyword, Validator};
pub use validator::JsonSchemaValidator;
