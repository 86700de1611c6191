//! # archi-telemetry
//!
//! Structured logging for LLM Architect, built on `tracing`.
//!
//! ```rust
//! use archi_telemetry::{init_telemetry, info, pipeline_span};
//!
//! init_telemetry("llm-architect").unwrap();
//! let span = pipeline_span("generate", "user_stories");
//! let _enter = span.enter();
//! info!("pipeline started");
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{Instrument, Span, debug, error, info, instrument, trace, warn};

pub use init::{TelemetryOptions, init_telemetry, init_with_options};
pub use spans::*;
