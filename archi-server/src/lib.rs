//! # archi-server
//!
//! REST surface over [`ProjectDesigner`](archi_workflow::ProjectDesigner).
//! Every artifact type gets the same route set under its own prefix; errors
//! come back as `{"kind", "detail"}` with a status derived from the kind.

pub mod config;
pub mod error;
pub mod rest;

pub use config::{SecurityConfig, ServerConfig};
pub use error::{ApiErrorBody, ApiResult, status_for};
pub use rest::create_app;
