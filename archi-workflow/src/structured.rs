use crate::prompts::RenderedPrompt;
use crate::settings::WorkflowSettings;
use archi_core::{
    ArchiError, Content, GenerateContentConfig, Llm, LlmRequest, Result,
};
use archi_schema::Schema;
use archi_telemetry::{Instrument, debug, model_call_span};
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;

const RESPONSE_PREVIEW_CHARS: usize = 500;

/// Calls the model with a response schema and parses the reply as JSON.
///
/// Any failure of the model call, an empty reply, or a reply that is not
/// JSON is a service error. Schema conformance is left to the caller.
#[derive(Clone)]
pub struct StructuredGenerator {
    llm: Arc<dyn Llm>,
    settings: WorkflowSettings,
}

impl StructuredGenerator {
    pub fn new(llm: Arc<dyn Llm>, settings: WorkflowSettings) -> Self {
        Self { llm, settings }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    pub async fn invoke(&self, prompt: RenderedPrompt, schema: &Schema) -> Result<Value> {
        let request = LlmRequest::new(
            self.settings.model.clone(),
            vec![Content::system(prompt.system), Content::user(prompt.user)],
        )
        .with_config(GenerateContentConfig {
            temperature: Some(self.settings.temperature),
            max_output_tokens: self.settings.max_output_tokens,
            ..Default::default()
        })
        .with_response_schema(schema.to_json_schema());

        let span = model_call_span(self.llm.name());
        let text = self.collect_text(request).instrument(span).await?;
        parse_json_reply(&text)
    }

    async fn collect_text(&self, request: LlmRequest) -> Result<String> {
        let mut stream = self
            .llm
            .generate_content(request, self.settings.stream)
            .await
            .map_err(as_service_error)?;

        let mut text = String::new();
        while let Some(item) = stream.next().await {
            let response = item.map_err(as_service_error)?;
            if let Some(message) = &response.error_message {
                let code = response.error_code.as_deref().unwrap_or("unknown");
                return Err(ArchiError::service(format!("model returned error {code}: {message}")));
            }
            text.push_str(&response.text());
        }
        debug!(model = self.llm.name(), chars = text.len(), "model reply collected");
        Ok(text)
    }
}

fn as_service_error(error: ArchiError) -> ArchiError {
    match error {
        ArchiError::Service(_) => error,
        other => ArchiError::service(other.to_string()),
    }
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(RESPONSE_PREVIEW_CHARS).collect();
    if text.chars().count() > RESPONSE_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

/// Parses a model reply, tolerating a surrounding markdown code fence.
pub(crate) fn parse_json_reply(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ArchiError::service("model returned an empty response"));
    }

    let body = strip_code_fence(trimmed);
    serde_json::from_str(body).map_err(|e| {
        ArchiError::service(format!(
            "model output is not valid JSON: {e} - response: {}",
            preview(trimmed)
        ))
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else { return text };
    // drop the info string ("json") up to the first newline
    let rest = rest.find('\n').map_or(rest, |i| &rest[i + 1..]);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
