//! # archi-schema
//!
//! One canonical [`Schema`] per design document. Its JSON Schema rendering is
//! compiled with `jsonschema` for first-failure [`validate`] and handed to the
//! model as its response format.
//!
//! ```rust
//! use archi_schema::{Document, UserStoryDocument};
//! use serde_json::json;
//!
//! let err = UserStoryDocument::from_value(json!({"stories": []})).unwrap_err();
//! assert_eq!(err.to_string(), "Format error: field 'stories': array must not be empty");
//! ```

pub mod data_model;
pub mod document;
pub mod schema;
pub mod system_design;
pub mod user_story;
pub mod validator;

pub use data_model::{
    Cardinality, DataModelDocument, Entity, EntityKind, Property, Relation, Relationship,
};
pub use document::{AnyDocument, Document};
pub use schema::{Field, ObjectSchema, Schema};
pub use system_design::{ApiEndpoint, SystemDesignDocument, SystemModule};
pub use user_story::{UserStory, UserStoryDocument};
pub use validator::{
    SchemaValidator, Validation, Violation, ViolationKind, cached_validator, validate, validate_str,
};
