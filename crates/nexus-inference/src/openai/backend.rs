//! OpenAI-compatible chat completion client.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use nexus_core::defaults::{CHAT_COMPLETIONS_PATH, GEN_MODEL, OPENAI_URL, TIMEOUT_SECS};
use nexus_core::logging::elapsed_ms;
use nexus_core::{CompletionBackend, Error, Result};

use super::error::UpstreamErrorCode;
use super::types::ChatCompletionRequest;
use crate::extract::extract_answer;

/// Configuration for the completion client.
#[derive(Clone)]
pub struct CompletionConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// Bearer token. Blank means "not configured" and fails at query time.
    pub api_key: String,
    /// Model to use for completions.
    pub model: String,
    /// Request deadline in seconds.
    pub timeout_seconds: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_URL.to_string(),
            api_key: String::new(),
            model: GEN_MODEL.to_string(),
            timeout_seconds: TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.has_api_key() { "SET" } else { "NOT SET" })
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl CompletionConfig {
    /// Read configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OPENAI_API_KEY` | (empty) |
    /// | `OPENAI_MODEL` | `gpt-4.1-mini` |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
    /// | `OPENAI_TIMEOUT` | `300` |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            base_url: non_blank("OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_URL.to_string()),
            api_key: non_blank("OPENAI_API_KEY").unwrap_or_default(),
            model: non_blank("OPENAI_MODEL").unwrap_or_else(|| GEN_MODEL.to_string()),
            timeout_seconds: non_blank("OPENAI_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(TIMEOUT_SECS),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Full URL of the chat completions endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }
}

/// Chat completion client for OpenAI-compatible APIs.
///
/// Holds no per-query state; the inner HTTP client only pools connections.
pub struct OpenAIClient {
    client: Client,
    config: CompletionConfig,
}

impl OpenAIClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "completion",
            url = %config.endpoint(),
            model = %config.model,
            api_key_set = config.has_api_key(),
            timeout_secs = config.timeout_seconds,
            "Initializing completion client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(CompletionConfig::from_env())
    }
}

#[async_trait]
impl CompletionBackend for OpenAIClient {
    #[instrument(skip(self, prompt), fields(subsystem = "inference", component = "completion", op = "complete", model = %self.config.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self.config.api_key.trim();
        if api_key.is_empty() {
            return Err(Error::Config(
                "OPENAI_API_KEY is not set; no completion request was sent".to_string(),
            ));
        }

        let body = ChatCompletionRequest::for_prompt(&self.config.model, prompt).to_body();
        let start = Instant::now();

        debug!(body_len = body.len(), "Sending completion request");

        let response = self
            .client
            .post(self.config.endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response body: {}", e)))?;

        if status != StatusCode::OK {
            let code = UpstreamErrorCode::from_response(status.as_u16(), &raw);
            warn!(
                status = status.as_u16(),
                code = ?code,
                duration_ms = elapsed_ms(start),
                "Completion API rejected the request"
            );
            return Err(Error::Upstream {
                status: status.as_u16(),
                body: raw,
            });
        }

        let answer = extract_answer(&raw);
        debug!(
            response_len = answer.len(),
            duration_ms = elapsed_ms(start),
            "Completion received"
        );
        Ok(answer)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
