//! OpenAI-compatible chat-completions provider.

mod client;
mod config;
pub(crate) mod convert;

pub use client::OpenAICompatibleClient;
pub use config::{DEFAULT_API_BASE, OpenAICompatibleConfig};
