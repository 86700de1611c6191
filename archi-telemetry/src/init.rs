//! Subscriber initialization

use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceLock<()> = OnceLock::new();

/// How the global subscriber is set up.
#[derive(Debug, Clone)]
pub struct TelemetryOptions {
    pub service_name: String,
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit one JSON object per event instead of human-readable lines.
    pub json: bool,
}

impl TelemetryOptions {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into(), log_level: "info".to_string(), json: false }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Initialize console logging at `info` (or `RUST_LOG`).
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    init_with_options(&TelemetryOptions::new(service_name))
}

/// Initialize the global subscriber once; later calls are no-ops.
///
/// `RUST_LOG` takes precedence over `options.log_level`.
pub fn init_with_options(options: &TelemetryOptions) -> Result<(), Box<dyn std::error::Error>> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&options.log_level)?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if options.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true).with_line_number(true))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .try_init()
    };

    // another subscriber may already be installed (tests, embedding apps)
    if installed.is_ok() {
        tracing::info!(service.name = %options.service_name, "Telemetry initialized");
    }
    let _ = INIT.set(());
    Ok(())
}
