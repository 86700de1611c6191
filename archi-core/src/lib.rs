//! # archi-core
//!
//! Core traits and types shared by every LLM Architect crate.
//!
//! ## Overview
//!
//! - [`Llm`] - The injected text-generation capability the pipelines call
//! - [`ArtifactType`] / [`Slot`] - Which document lives where
//! - [`SaveDecision`] - The exclusive save / promote / discard choice
//! - [`ArchiError`] / [`Result`] - Unified error handling with a machine-checkable [`ErrorKind`]
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait Llm: Send + Sync {
//!     fn name(&self) -> &str;
//!     async fn generate_content(&self, req: LlmRequest, stream: bool) -> Result<LlmResponseStream>;
//! }
//! ```

pub mod artifact;
pub mod error;
pub mod model;
pub mod types;

pub use artifact::{ArtifactType, SaveAction, SaveDecision, Slot};
pub use error::{ArchiError, ErrorKind, Result};
pub use model::{
    FinishReason, GenerateContentConfig, Llm, LlmRequest, LlmResponse, LlmResponseStream,
    UsageMetadata,
};
pub use types::{Content, Part};
