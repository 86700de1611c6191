//! OpenAI-compatible client implementation.

use super::config::OpenAICompatibleConfig;
use super::convert::{self, ChatCompletionRequest, ChatCompletionResponse};
use crate::retry::{RequestFailure, RetryConfig, execute_with_retry};
use archi_core::{ArchiError, Llm, LlmRequest, LlmResponseStream};
use archi_telemetry::{debug, warn};
use async_stream::try_stream;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;

/// Client for any endpoint speaking the chat-completions protocol.
///
/// # Example
///
/// ```rust,ignore
/// use archi_model::{OpenAICompatibleClient, OpenAICompatibleConfig};
///
/// let client = OpenAICompatibleClient::new(
///     OpenAICompatibleConfig::new(std::env::var("OPENAI_API_KEY")?, "gpt-4o-mini"),
/// )?;
/// ```
pub struct OpenAICompatibleClient {
    client: Client,
    config: OpenAICompatibleConfig,
    retry_config: RetryConfig,
}

impl OpenAICompatibleClient {
    pub fn new(config: OpenAICompatibleConfig) -> Result<Self, ArchiError> {
        if config.api_key.trim().is_empty() {
            return Err(ArchiError::config("API key is empty"));
        }
        let client = Client::builder()
            .build()
            .map_err(|e| ArchiError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config, retry_config: RetryConfig::default() })
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    pub fn config(&self) -> &OpenAICompatibleConfig {
        &self.config
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.config.effective_base_url().trim_end_matches('/'))
    }

    fn build_request(&self, request: &LlmRequest, stream: bool) -> ChatCompletionRequest {
        let config = request.config.as_ref();
        let model = if request.model.is_empty() { &self.config.model } else { &request.model };

        ChatCompletionRequest {
            model: model.clone(),
            messages: request.contents.iter().map(convert::content_to_message).collect(),
            temperature: config.and_then(|c| c.temperature),
            top_p: config.and_then(|c| c.top_p),
            max_tokens: config
                .and_then(|c| c.max_output_tokens)
                .map(|t| t as u32)
                .or(self.config.max_tokens),
            stream: Some(stream),
            response_format: config
                .and_then(|c| c.response_schema.as_ref())
                .map(|schema| convert::response_format(schema, self.config.strict_schema)),
        }
    }
}

#[async_trait]
impl Llm for OpenAICompatibleClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate_content(
        &self,
        request: LlmRequest,
        stream: bool,
    ) -> Result<LlmResponseStream, ArchiError> {
        let api_url = self.api_url();
        let api_key = self.config.api_key.clone();
        let chat_request = self.build_request(&request, stream);
        let client = self.client.clone();
        let retry_config = self.retry_config.clone();

        let response_stream = try_stream! {
            // Retries cover the request only; a stream that fails mid-way is surfaced as is.
            let response = execute_with_retry(&retry_config, RequestFailure::is_retryable, || {
                let client = client.clone();
                let api_url = api_url.clone();
                let api_key = api_key.clone();
                let chat_request = chat_request.clone();
                async move {
                    let response = client
                        .post(&api_url)
                        .bearer_auth(&api_key)
                        .json(&chat_request)
                        .send()
                        .await
                        .map_err(|e| {
                            let retryable = e.is_timeout() || e.is_connect();
                            let error =
                                ArchiError::service(format!("chat completion request failed: {e}"));
                            RequestFailure::transport(error, retryable)
                        })?;

                    let status = response.status();
                    if !status.is_success() {
                        let error_text = response.text().await.unwrap_or_default();
                        return Err(RequestFailure::status(
                            status.as_u16(),
                            ArchiError::service(format!(
                                "chat completion API error {status}: {error_text}"
                            )),
                        ));
                    }

                    Ok(response)
                }
            })
            .await
            .map_err(ArchiError::from)?;

            if stream {
                // decoded per event, never per network chunk
                let mut events = response.bytes_stream().eventsource();

                while let Some(event) = events.next().await {
                    let event = event
                        .map_err(|e| ArchiError::service(format!("stream read error: {e}")))?;
                    let Some(data) = convert::event_payload(&event.data) else { continue };

                    match serde_json::from_str::<ChatCompletionResponse>(data) {
                        Ok(chunk) => {
                            if let Some(response) = convert::from_chunk(&chunk) {
                                yield response;
                            }
                        }
                        Err(e) => warn!(error = %e, data, "skipping unparseable stream chunk"),
                    }
                }
            } else {
                let response_text = response
                    .text()
                    .await
                    .map_err(|e| ArchiError::service(format!("failed to read response: {e}")))?;

                let chat_response: ChatCompletionResponse = serde_json::from_str(&response_text)
                    .map_err(|e| {
                        ArchiError::service(format!("failed to parse response: {e} - {response_text}"))
                    })?;

                let response = convert::from_response(&chat_response);
                debug!(
                    finish_reason = ?response.finish_reason,
                    total_tokens = response.usage_metadata.as_ref().map(|u| u.total_token_count),
                    "chat completion received"
                );
                yield response;
            }
        };

        Ok(Box::pin(response_stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archi_core::{Content, GenerateContentConfig};
    use serde_json::json;

    fn client() -> OpenAICompatibleClient {
        OpenAICompatibleClient::new(
            OpenAICompatibleConfig::new("sk-test", "qwen-flash")
                .with_base_url("http://localhost:9999/v1/")
                .with_max_tokens(2048),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let err = OpenAICompatibleClient::new(OpenAICompatibleConfig::new(" ", "m")).err().unwrap();
        assert_eq!(err.kind(), archi_core::ErrorKind::Configuration);
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        assert_eq!(client().api_url(), "http://localhost:9999/v1/chat/completions");
    }

    #[test]
    fn test_build_request_carries_schema_and_defaults() {
        let request = LlmRequest::new("", vec![Content::system("rules"), Content::user("go")])
            .with_config(GenerateContentConfig { temperature: Some(0.2), ..Default::default() })
            .with_response_schema(json!({"type": "object"}));

        let chat = client().build_request(&request, false);
        assert_eq!(chat.model, "qwen-flash");
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.temperature, Some(0.2));
        assert_eq!(chat.max_tokens, Some(2048));
        assert_eq!(chat.response_format.unwrap()["json_schema"]["schema"]["type"], "object");
    }
}
