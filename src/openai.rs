//! OpenAI-backed completion client (feature `openai`).
//!
//! A thin reqwest client over the chat-completions API. It deliberately
//! does no retrying: a failed request surfaces as
//! [`Error::Service`](crate::Error::Service) and aborts the caller's
//! wave, per the pipeline's error contract.
//!
//! The API exposes no token-counting endpoint, so the [`TokenMeter`]
//! implementation falls back to the [`HeuristicMeter`] estimate
//! (~4 chars/token). Budgets enforced against this client are therefore
//! approximate; size them with headroom.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Completer, Error, HeuristicMeter, Result, TokenMeter};

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Chat-completions client implementing both pipeline capabilities.
///
/// ## Example
///
/// ```rust,ignore
/// use distill::{OpenAiClient, SummarizeConfig, Summarizer};
///
/// let client = OpenAiClient::new(std::env::var("OPENAI_API_KEY")?);
/// let summarizer = Summarizer::new(client, SummarizeConfig::default());
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Create a client with the default model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create a client targeting a specific model.
    #[must_use]
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Completer for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "completion request");

        let response = self
            .http
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Service(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Service(e.to_string()))?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::MalformedResponse("response contained no choices".into()))
    }
}

#[async_trait]
impl TokenMeter for OpenAiClient {
    async fn count_tokens(&self, text: &str) -> Result<usize> {
        // No counting endpoint exists; estimate locally.
        Ok(HeuristicMeter::estimate(text))
    }
}
