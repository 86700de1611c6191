use crate::{Result, types::Content};
use async_trait::async_trait;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

pub type LlmResponseStream = Pin<Box<dyn Stream<Item = Result<LlmResponse>> + Send>>;

/// Text-in, text-out generation capability.
///
/// Pipelines receive an `Arc<dyn Llm>` at construction; nothing in the
/// workspace holds a process-wide client.
#[async_trait]
pub trait Llm: Send + Sync {
    fn name(&self) -> &str;
    async fn generate_content(&self, req: LlmRequest, stream: bool) -> Result<LlmResponseStream>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub model: String,
    pub contents: Vec<Content>,
    pub config: Option<GenerateContentConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateContentConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<i32>,
    /// JSON Schema the provider should constrain its output to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: Option<Content>,
    pub usage_metadata: Option<UsageMetadata>,
    pub finish_reason: Option<FinishReason>,
    pub partial: bool,
    pub turn_complete: bool,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_token_count: i32,
    pub candidates_token_count: i32,
    pub total_token_count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Other,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, contents: Vec<Content>) -> Self {
        Self { model: model.into(), contents, config: None }
    }

    /// Set the response schema for structured output.
    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        let config = self.config.get_or_insert_with(GenerateContentConfig::default);
        config.response_schema = Some(schema);
        self
    }

    /// Set the generation config.
    pub fn with_config(mut self, config: GenerateContentConfig) -> Self {
        self.config = Some(config);
        self
    }
}

impl LlmResponse {
    pub fn new(content: Content) -> Self {
        Self {
            content: Some(content),
            usage_metadata: None,
            finish_reason: Some(FinishReason::Stop),
            partial: false,
            turn_complete: true,
            error_code: None,
            error_message: None,
        }
    }

    /// Text carried by this response, empty when there is no content.
    pub fn text(&self) -> String {
        self.content.as_ref().map(Content::text).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_request_creation() {
        let req = LlmRequest::new("test-model", vec![]);
        assert_eq!(req.model, "test-model");
        assert!(req.contents.is_empty());
        assert!(req.config.is_none());
    }

    #[test]
    fn test_llm_request_with_response_schema_keeps_config() {
        let req = LlmRequest::new("m", vec![])
            .with_config(GenerateContentConfig { temperature: Some(0.2), ..Default::default() })
            .with_response_schema(serde_json::json!({"type": "object"}));

        let config = req.config.unwrap();
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.response_schema, Some(serde_json::json!({"type": "object"})));
    }

    #[test]
    fn test_llm_response_text() {
        let resp = LlmResponse::new(Content::new("model").with_text("ok"));
        assert_eq!(resp.text(), "ok");
        assert!(resp.turn_complete);
        assert_eq!(LlmResponse::default().text(), "");
    }

    #[tokio::test]
    async fn test_llm_trait_object() {
        struct Echo;

        #[async_trait]
        impl Llm for Echo {
            fn name(&self) -> &str {
                "echo"
            }

            async fn generate_content(
                &self,
                req: LlmRequest,
                _stream: bool,
            ) -> Result<LlmResponseStream> {
                let text = req.contents.iter().map(Content::text).collect::<String>();
                let s = async_stream::stream! {
                    yield Ok(LlmResponse::new(Content::new("model").with_text(text)));
                };
                Ok(Box::pin(s))
            }
        }

        use futures::StreamExt;
        let llm: std::sync::Arc<dyn Llm> = std::sync::Arc::new(Echo);
        let mut stream = llm
            .generate_content(LlmRequest::new("m", vec![Content::user("ping")]), false)
            .await
            .unwrap();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.text(), "ping");
    }
}
