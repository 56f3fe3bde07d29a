//! Minimal client for the Gemini `generateContent` endpoint.
//!
//! One non-streaming request per call, no conversation history, no retries.
//! Clients are built per invocation and dropped on every exit path, so
//! concurrent scans never share mutable transport state.

use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

#[derive(Error, Debug)]
pub enum GeminiError {
    /// Missing API key or unusable client configuration.
    #[error("client not configured: {0}")]
    NotConfigured(String),

    /// The endpoint answered with a non-success status.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The endpoint answered 2xx but the body was not a usable completion.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure, including connect errors and timeouts.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from config, resolving the API key from the configured
    /// environment variable. The request timeout is set on the underlying
    /// HTTP client so no call can outlive `timeout_seconds`.
    pub fn from_config(config: &Config) -> Result<Self, GeminiError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            GeminiError::NotConfigured(format!("set the {} env var", config.api_key_env))
        })?;
        Self::with_api_key(config, api_key)
    }

    /// Build a client with an explicit API key, bypassing the environment.
    pub fn with_api_key(config: &Config, api_key: String) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(GeminiClient {
            http,
            base_url: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: config.model.clone(),
            api_key,
        })
    }

    fn generate_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/v1beta/models/{}:generateContent", self.model)
    }

    /// Send one prompt and return the model's reply text.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        log::debug!(
            "sending generateContent request, model={}, prompt_len={}",
            self.model,
            prompt.len()
        );

        let response = self
            .http
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::InvalidResponse(format!("failed to parse response: {e}")))?;

        parsed
            .text()
            .ok_or_else(|| GeminiError::InvalidResponse("no candidate text in response".to_string()))
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"***")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GenerateContentResponse {
    /// Reply text of the first candidate, with multi-part replies
    /// concatenated. `None` when the response carries no candidates.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        if candidate.content.parts.is_empty() {
            return None;
        }
        Some(
            candidate
                .content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect(),
        )
    }
}
