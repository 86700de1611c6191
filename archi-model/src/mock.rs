use archi_core::{
    ArchiError, Content, Llm, LlmRequest, LlmResponse, LlmResponseStream, Result,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Turn {
    Respond(Vec<LlmResponse>),
    Fail(String),
}

/// Scripted model. Each call consumes the next turn; requests are recorded.
#[derive(Clone)]
pub struct MockLlm {
    name: String,
    turns: Arc<Mutex<VecDeque<Turn>>>,
    requests: Arc<Mutex<Vec<LlmRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            turns: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a turn that streams `response`.
    pub fn with_response(self, response: LlmResponse) -> Self {
        lock(&self.turns).push_back(Turn::Respond(vec![response]));
        self
    }

    /// Queue a turn that streams `chunks` as partial responses.
    pub fn with_chunks<I, S>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let responses = chunks
            .into_iter()
            .map(|chunk| LlmResponse {
                partial: true,
                turn_complete: false,
                ..LlmResponse::new(Content::new("model").with_text(chunk))
            })
            .collect();
        lock(&self.turns).push_back(Turn::Respond(responses));
        self
    }

    /// Queue a turn that answers with `text`.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_response(LlmResponse::new(Content::new("model").with_text(text)))
    }

    /// Queue a turn whose call fails with a service error.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        lock(&self.turns).push_back(Turn::Fail(message.into()));
        self
    }

    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<LlmRequest> {
        lock(&self.requests).last().cloned()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_content(&self, req: LlmRequest, _stream: bool) -> Result<LlmResponseStream> {
        lock(&self.requests).push(req);
        let turn = lock(&self.turns).pop_front();

        let responses = match turn {
            Some(Turn::Respond(responses)) => responses,
            Some(Turn::Fail(message)) => return Err(ArchiError::service(message)),
            None => return Err(ArchiError::service(format!("{}: no scripted response left", self.name))),
        };
        let stream = async_stream::stream! {
            for response in responses {
                yield Ok(response);
            }
        };
        Ok(Box::pin(stream))
    }
}
