//! `OpenAI` Chat Completions client.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::OpenAIConfig;

use super::ChatModel;
use super::error::{ApiErrorResponse, LlmError};
use super::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Default retry delay when the provider omits `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// `OpenAI` API client.
#[derive(Clone)]
pub struct OpenAiClient {
    inner: Arc<OpenAiClientInner>,
}

struct OpenAiClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.inner.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiClient {
    /// Create a new client for the configured base URL.
    #[must_use]
    pub fn new(config: &OpenAIConfig) -> Self {
        Self {
            inner: Arc::new(OpenAiClientInner {
                client: reqwest::Client::new(),
                endpoint: config.chat_completions_url(),
                api_key: config.api_key.clone(),
            }),
        }
    }

    /// Send a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the provider rejects it, or the
    /// response body cannot be parsed.
    #[instrument(
        skip(self, request),
        fields(model = %request.model, messages = request.messages.len())
    )]
    pub async fn chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .bearer_auth(self.inner.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| LlmError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(handle_error_status(status, response).await)
        }
    }
}

/// Map an error status code to an `LlmError`.
async fn handle_error_status(status: reqwest::StatusCode, response: reqwest::Response) -> LlmError {
    // Check for rate limiting
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return LlmError::RateLimited(retry_after);
    }

    // Check for unauthorized
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return LlmError::Unauthorized("Invalid API key".to_string());
    }

    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => LlmError::Api {
                error_type: api_error
                    .error
                    .error_type
                    .unwrap_or_else(|| status.as_u16().to_string()),
                message: api_error.error.message,
            },
            Err(_) => LlmError::Api {
                error_type: status.as_u16().to_string(),
                message: body,
            },
        },
        Err(e) => LlmError::Http(e),
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        self.chat(&request).await
    }
}
