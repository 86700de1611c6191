//! Wire types for the chat-completions API and conversions to core types.

use archi_core::{Content, FinishReason, LlmResponse, UsageMetadata};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub delta: Option<DeltaMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeltaMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

pub fn content_to_message(content: &Content) -> Message {
    let role = match content.role.as_str() {
        "model" | "assistant" => "assistant",
        "system" => "system",
        _ => "user",
    };
    let text = content.text();
    Message { role: role.to_string(), content: (!text.is_empty()).then_some(text) }
}

/// `response_format` payload constraining output to `schema`.
pub fn response_format(schema: &Value, strict: bool) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "document",
            "schema": schema,
            "strict": strict,
        }
    })
}

pub fn finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::MaxTokens,
        "content_filter" => FinishReason::Safety,
        _ => FinishReason::Other,
    }
}

fn usage_metadata(usage: &Usage) -> UsageMetadata {
    UsageMetadata {
        prompt_token_count: usage.prompt_tokens as i32,
        candidates_token_count: usage.completion_tokens as i32,
        total_token_count: usage.total_tokens as i32,
    }
}

/// Converts a complete (non-streaming) response.
pub fn from_response(response: &ChatCompletionResponse) -> LlmResponse {
    let choice = response.choices.first();
    let text = choice.and_then(|c| c.message.as_ref()).and_then(|m| m.content.clone());

    LlmResponse {
        content: text.map(|t| Content::new("model").with_text(t)),
        usage_metadata: response.usage.as_ref().map(usage_metadata),
        finish_reason: choice.and_then(|c| c.finish_reason.as_deref()).map(finish_reason),
        partial: false,
        turn_complete: true,
        error_code: None,
        error_message: None,
    }
}

/// Converts one streamed chunk. Returns `None` for chunks carrying nothing.
pub fn from_chunk(chunk: &ChatCompletionResponse) -> Option<LlmResponse> {
    let choice = chunk.choices.first();
    let text = choice
        .and_then(|c| c.delta.as_ref())
        .and_then(|d| d.content.clone())
        .filter(|t| !t.is_empty());
    let finish = choice.and_then(|c| c.finish_reason.as_deref()).map(finish_reason);
    let usage = chunk.usage.as_ref().map(usage_metadata);

    if text.is_none() && finish.is_none() && usage.is_none() {
        return None;
    }

    Some(LlmResponse {
        content: text.map(|t| Content::new("model").with_text(t)),
        usage_metadata: usage,
        finish_reason: finish,
        partial: finish.is_none(),
        turn_complete: finish.is_some(),
        error_code: None,
        error_message: None,
    })
}

/// JSON payload of one SSE event. The `[DONE]` sentinel and empty events yield `None`.
pub fn event_payload(data: &str) -> Option<&str> {
    let data = data.trim();
    (data != "[DONE]" && !data.is_empty()).then_some(data)
}
