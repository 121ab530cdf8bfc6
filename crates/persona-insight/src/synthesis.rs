//! Synthesis service trait and implementations.
//!
//! Two capabilities behind one trait:
//! - `summarize`: (instruction + data) in, one short text string out. Used
//!   by the per-cluster insight extraction.
//! - `synthesize_json`: a prompt that demands a bare JSON object; the reply
//!   is parsed into a `serde_json::Value`. Used once by the aggregator.
//!
//! `OpenAiSynthesis` talks to an OpenAI-compatible `/chat/completions`
//! endpoint; `MockSynthesis` replays scripted responses for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use persona_core::config::ApiConfig;

use crate::error::InsightError;

/// Black-box language-understanding capability.
pub trait SynthesisService: Send + Sync {
    /// Produce one short text answer for the given prompt.
    fn summarize(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, InsightError>> + Send;

    /// Produce a JSON object for the given prompt. The capability is asked
    /// to emit only JSON with no surrounding prose.
    fn synthesize_json(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, InsightError>> + Send;
}

/// Forwarding impl so shared references can be handed to pipeline stages.
impl<T: SynthesisService> SynthesisService for &T {
    fn summarize(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, InsightError>> + Send {
        (**self).summarize(prompt)
    }

    fn synthesize_json(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, InsightError>> + Send {
        (**self).synthesize_json(prompt)
    }
}

// ---------------------------------------------------------------------------
// OpenAiSynthesis - remote chat API
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// Synthesis backend talking to an OpenAI-compatible chat API.
///
/// The cheap `insight_model` serves the many small summarize calls; the
/// stronger `persona_model` serves the single aggregation call.
#[derive(Debug, Clone)]
pub struct OpenAiSynthesis {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    summarize_model: String,
    synthesis_model: String,
}

impl OpenAiSynthesis {
    pub fn new(api: &ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key: api.api_key.clone(),
            summarize_model: api.insight_model.clone(),
            synthesis_model: api.persona_model.clone(),
        }
    }

    async fn chat(
        &self,
        model: &str,
        prompt: &str,
        json_mode: bool,
    ) -> Result<String, InsightError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        debug!(model, json_mode, "Requesting chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::Capability(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Capability(format!(
                "chat API returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Capability(format!("malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| InsightError::Capability("response contained no choices".to_string()))
    }
}

impl SynthesisService for OpenAiSynthesis {
    async fn summarize(&self, prompt: &str) -> Result<String, InsightError> {
        self.chat(&self.summarize_model, prompt, false).await
    }

    async fn synthesize_json(&self, prompt: &str) -> Result<serde_json::Value, InsightError> {
        let content = self.chat(&self.synthesis_model, prompt, true).await?;
        serde_json::from_str(&content)
            .map_err(|e| InsightError::Capability(format!("reply was not a JSON object: {}", e)))
    }
}

// ---------------------------------------------------------------------------
// MockSynthesis - scripted responses for testing
// ---------------------------------------------------------------------------

type Scripted<T> = Mutex<VecDeque<Result<T, String>>>;

/// Mock synthesis service replaying scripted responses in order.
///
/// An exhausted summarize queue falls back to a fixed answer so tests do
/// not have to script every (cluster, category) call; an exhausted JSON
/// queue is an error. Call counters allow asserting that a capability was
/// (or was not) invoked.
#[derive(Default)]
pub struct MockSynthesis {
    summaries: Scripted<String>,
    json_values: Scripted<serde_json::Value>,
    summarize_calls: AtomicUsize,
    synthesize_calls: AtomicUsize,
}

impl MockSynthesis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_summary(&self, reply: &str) {
        self.summaries
            .lock()
            .expect("mock lock")
            .push_back(Ok(reply.to_string()));
    }

    pub fn push_summary_error(&self, message: &str) {
        self.summaries
            .lock()
            .expect("mock lock")
            .push_back(Err(message.to_string()));
    }

    pub fn push_json(&self, value: serde_json::Value) {
        self.json_values
            .lock()
            .expect("mock lock")
            .push_back(Ok(value));
    }

    pub fn push_json_error(&self, message: &str) {
        self.json_values
            .lock()
            .expect("mock lock")
            .push_back(Err(message.to_string()));
    }

    pub fn summarize_calls(&self) -> usize {
        self.summarize_calls.load(Ordering::SeqCst)
    }

    pub fn synthesize_calls(&self) -> usize {
        self.synthesize_calls.load(Ordering::SeqCst)
    }
}

impl SynthesisService for MockSynthesis {
    async fn summarize(&self, _prompt: &str) -> Result<String, InsightError> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        match self.summaries.lock().expect("mock lock").pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(InsightError::Capability(message)),
            None => Ok("A scripted fallback insight".to_string()),
        }
    }

    async fn synthesize_json(&self, _prompt: &str) -> Result<serde_json::Value, InsightError> {
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);
        match self.json_values.lock().expect("mock lock").pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(InsightError::Capability(message)),
            None => Err(InsightError::Capability(
                "no scripted JSON response".to_string(),
            )),
        }
    }
}
