//! Gemini API provider.
//!
//! Calls `POST {base}/{model}:generateContent` — the non-streaming
//! endpoint — with the full conversation history on every exchange.
//! The key is passed in the `x-goog-api-key` header. The reply text is
//! the concatenation of the first candidate's text parts.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LlmConfig;
use crate::error::{ApiErrorKind, ChatError};

use super::client::ChatModel;
use super::{Content, Role};

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// ── Gemini API request types ─────────────────────────────

/// `generateContent` request body.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// One conversation entry on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    role: Role,
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

// ── Gemini API response types ────────────────────────────

/// `generateContent` response body.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

// ── GeminiClient ─────────────────────────────────────────

/// Client for the Gemini `generateContent` API.
pub struct GeminiClient {
    client: Client,
    config: LlmConfig,
    api_key: String,
}

impl GeminiClient {
    /// Creates a client from configuration and a resolved API key.
    ///
    /// A request timeout is applied only when the config asks for one;
    /// the default is to block until the server answers.
    pub fn new(config: LlmConfig, api_key: String) -> Result<Self, ChatError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::Transport(format!("HTTP client init: {e}")))?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.config.model)
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn generate(&self, history: &[Content]) -> Result<String, ChatError> {
        let request = build_request(history, self.config.max_output_tokens);

        debug!(
            "Calling Gemini API ({}) with {} history entries",
            self.config.model,
            history.len()
        );

        let response = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                kind: ApiErrorKind::from_status(status.as_u16()),
                status: status.as_u16(),
                message: body,
            });
        }

        let resp: GenerateContentResponse = response.json().await?;
        let text = parse_response(resp)?;

        info!("Gemini reply: {} chars", text.len());
        Ok(text)
    }

    fn description(&self) -> String {
        format!("gemini ({})", self.config.model)
    }
}

// ── Request building / response parsing ──────────────────

/// Builds the request body from the conversation history.
fn build_request(history: &[Content], max_output_tokens: Option<u32>) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: history
            .iter()
            .map(|c| WireContent {
                role: c.role,
                parts: vec![WirePart {
                    text: Some(c.text.clone()),
                }],
            })
            .collect(),
        generation_config: max_output_tokens
            .map(|max| GenerationConfig {
                max_output_tokens: max,
            }),
    }
}

/// Extracts the reply text from a decoded response.
///
/// Concatenates the text parts of the first candidate. A response with
/// no candidates or no text is malformed from this client's point of
/// view (blocked prompts surface that way on the non-streaming endpoint).
fn parse_response(resp: GenerateContentResponse) -> Result<String, ChatError> {
    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ChatError::MalformedResponse("no candidates".to_string()))?;

    let parts = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default();

    let text: String = parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        return Err(ChatError::MalformedResponse(
            "candidate contains no text parts".to_string(),
        ));
    }
    Ok(text)
}
