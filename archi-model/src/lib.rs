//! # archi-model
//!
//! [`Llm`](archi_core::Llm) implementations.
//!
//! - [`OpenAICompatibleClient`] - any `/chat/completions` endpoint (OpenAI, DashScope, vLLM, ...)
//! - [`MockLlm`] - scripted responses for tests

pub mod mock;
pub mod openai_compatible;
pub mod retry;

pub use mock::MockLlm;
pub use openai_compatible::{OpenAICompatibleClient, OpenAICompatibleConfig};
pub use retry::RetryConfig;
