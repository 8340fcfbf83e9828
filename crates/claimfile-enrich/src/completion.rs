use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{check_status, EnrichError};

/// One system+user prompt pair sent to a chat-completion model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Short tag for logs ("court-info", "legal-text", ...).
    pub purpose: &'static str,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the model for a JSON object response.
    pub json_mode: bool,
}

/// A chat-completion provider. Returns the raw text content of the first choice.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, EnrichError>;
}

/// OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiBackend {
    pub base_url: String,
    pub model: String,
    api_key: String,
    http: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }
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

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, EnrichError> {
        if self.api_key.is_empty() {
            return Err(EnrichError::MissingCredential("OpenAI API key"));
        }

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        info!(
            purpose = request.purpose,
            model = %self.model,
            "calling chat completions"
        );

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let parsed: ChatResponse = check_status(response, "openai")
            .await?
            .json()
            .await
            .map_err(|e| EnrichError::invalid_response(format!("openai: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                warn!(purpose = request.purpose, "completion had no content");
                EnrichError::invalid_response("No response from OpenAI")
            })?;

        info!(
            purpose = request.purpose,
            output_len = content.len(),
            "completion received"
        );
        Ok(content)
    }
}

/// Parses the JSON object embedded in a completion, tolerating code fences
/// and chatter around it.
pub fn extract_json<T: DeserializeOwned>(content: &str) -> Result<T, EnrichError> {
    let start = content.find('{');
    let end = content.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if e > s => &content[s..=e],
        _ => {
            warn!(content_len = content.len(), "no JSON object in completion");
            return Err(EnrichError::invalid_response("Invalid response format from OpenAI"));
        }
    };
    serde_json::from_str(json).map_err(|e| {
        warn!("failed to parse completion JSON: {}", e);
        EnrichError::invalid_response(format!("Invalid response format from OpenAI: {e}"))
    })
}
