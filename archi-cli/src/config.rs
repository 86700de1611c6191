//! Layered configuration: defaults, then an optional TOML file, then the environment.

use archi_model::OpenAICompatibleConfig;
use archi_telemetry::TelemetryOptions;
use archi_workflow::WorkflowSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A configuration problem, with a hint on how to fix it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into(), suggestion: None }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub api_key: String,
    /// Base URL of an OpenAI-compatible endpoint; the public OpenAI API when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchitectConfig {
    /// Root of the draft/result slot tree.
    pub outcomes_dir: PathBuf,
    /// Language the model writes document prose in.
    pub output_language: String,
    // tables after plain values, so the TOML rendering stays valid
    pub llm: LlmSettings,
    pub server: ServerSettings,
    pub log: LogSettings,
}

impl Default for ArchitectConfig {
    fn default() -> Self {
        Self {
            outcomes_dir: PathBuf::from("./outcomes"),
            output_language: "English".to_string(),
            llm: LlmSettings::default(),
            server: ServerSettings::default(),
            log: LogSettings::default(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(
    field: &str,
    var: &str,
    raw: &str,
    suggestion: &str,
) -> Result<T, ValidationError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        ValidationError::new(field, format!("Invalid {var} '{raw}': {e}")).with_suggestion(suggestion)
    })
}

impl ArchitectConfig {
    /// Defaults, overlaid with `file` when given, then with the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ValidationError> {
        let base = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::new("config", format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ValidationError> {
        toml::from_str(text).map_err(|e| {
            ValidationError::new("config", format!("invalid TOML: {e}"))
                .with_suggestion("See `llm-architect config` for the expected layout")
        })
    }

    /// Applies environment overrides read through `lookup`. Empty values are ignored.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(url) = get("OPENAI_API_URL") {
            self.llm.api_url = Some(url);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if let Some(raw) = get("ARCHI_TEMPERATURE") {
            self.llm.temperature =
                parse_env("llm.temperature", "ARCHI_TEMPERATURE", &raw, "Use a number like 0.2")?;
        }
        if let Some(raw) = get("ARCHI_MAX_TOKENS") {
            self.llm.max_tokens = Some(parse_env(
                "llm.max_tokens",
                "ARCHI_MAX_TOKENS",
                &raw,
                "Use a positive integer like 4096",
            )?);
        }
        if let Some(dir) = get("ARCHI_OUTCOMES_DIR") {
            self.outcomes_dir = PathBuf::from(dir);
        }
        if let Some(language) = get("ARCHI_OUTPUT_LANGUAGE") {
            self.output_language = language;
        }
        if let Some(host) = get("ARCHI_HOST") {
            self.server.host = host;
        }
        if let Some(raw) = get("ARCHI_PORT") {
            self.server.port =
                parse_env("server.port", "ARCHI_PORT", &raw, "Use a port number like 8000")?;
        }
        if let Some(level) = get("ARCHI_LOG_LEVEL") {
            self.log.level = level.to_ascii_lowercase();
        }
        if let Some(raw) = get("ARCHI_LOG_JSON") {
            self.log.json = parse_env("log.json", "ARCHI_LOG_JSON", &raw, "Use true or false")?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.llm.model.trim().is_empty() {
            return Err(ValidationError::new("llm.model", "Model name cannot be empty")
                .with_suggestion("Set OPENAI_MODEL, e.g. gpt-4o-mini"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ValidationError::new(
                "llm.temperature",
                format!("Temperature {} is out of range", self.llm.temperature),
            )
            .with_suggestion("Use a value between 0.0 and 2.0"));
        }
        if self.llm.max_tokens == Some(0) {
            return Err(ValidationError::new("llm.max_tokens", "Max tokens must be greater than 0"));
        }
        if let Some(url) = &self.llm.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::new(
                    "llm.api_url",
                    format!("'{url}' is not an http(s) URL"),
                )
                .with_suggestion("Use the base URL, e.g. https://api.openai.com/v1"));
            }
        }
        if self.outcomes_dir.as_os_str().is_empty() {
            return Err(ValidationError::new("outcomes_dir", "Outcomes directory cannot be empty"));
        }
        if self.output_language.trim().is_empty() {
            return Err(ValidationError::new("output_language", "Output language cannot be empty")
                .with_suggestion("Use a language name like English"));
        }
        if self.server.port == 0 {
            return Err(ValidationError::new("server.port", "Port must be greater than 0"));
        }
        if !VALID_LOG_LEVELS.contains(&self.log.level.as_str()) {
            return Err(ValidationError::new(
                "log.level",
                format!("Unknown log level '{}'", self.log.level),
            )
            .with_suggestion(format!("Valid levels: {}", VALID_LOG_LEVELS.join(", "))));
        }
        Ok(())
    }

    /// Commands that call the model need a key; `config` and `show` do not.
    pub fn require_api_key(&self) -> Result<(), ValidationError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(ValidationError::new("llm.api_key", "No API key configured")
                .with_suggestion("Set OPENAI_API_KEY in the environment or a .env file"));
        }
        Ok(())
    }

    /// Copy safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.llm.api_key = if self.llm.api_key.is_empty() {
            "(unset)".to_string()
        } else {
            let prefix: String = self.llm.api_key.chars().take(3).collect();
            format!("{prefix}***")
        };
        copy
    }

    pub fn model_config(&self) -> OpenAICompatibleConfig {
        let mut config = OpenAICompatibleConfig::new(&self.llm.api_key, &self.llm.model);
        if let Some(url) = &self.llm.api_url {
            config = config.with_base_url(url);
        }
        if let Some(max_tokens) = self.llm.max_tokens {
            config = config.with_max_tokens(max_tokens);
        }
        config
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        let mut settings = WorkflowSettings::default()
            .with_model(&self.llm.model)
            .with_temperature(self.llm.temperature)
            .with_output_language(&self.output_language);
        settings.max_output_tokens = self.llm.max_tokens.map(|t| i32::try_from(t).unwrap_or(i32::MAX));
        settings
    }

    pub fn telemetry_options(&self) -> TelemetryOptions {
        TelemetryOptions::new("llm-architect").with_log_level(&self.log.level).with_json(self.log.json)
    }
}
