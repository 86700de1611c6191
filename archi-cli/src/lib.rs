//! # archi-cli
//!
//! The `llm-architect` binary: layered configuration, the HTTP server, and
//! one-shot commands over the same workflows.

pub mod cli;
pub mod commands;
pub mod config;
pub mod serve;

pub use cli::{Cli, Commands};
pub use config::{ArchitectConfig, ValidationError};
