use serde::{Deserialize, Serialize};

/// Model parameters shared by every pipeline of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    /// Model name sent with each request; empty lets the client choose.
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: Option<i32>,
    /// Request a streamed response and assemble it.
    pub stream: bool,
    /// Language the model should write prose fields in.
    pub output_language: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.2,
            max_output_tokens: None,
            stream: false,
            output_language: "English".to_string(),
        }
    }
}

impl WorkflowSettings {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_output_language(mut self, language: impl Into<String>) -> Self {
        self.output_language = language.into();
        self
    }
}
