//! Client for the OpenAI-compatible chat-completions gateway.
//!
//! One call sends a system and a user message and returns the text of the
//! first choice. HTTP failures are classified into [`GatewayErrorKind`]s by
//! [`check_response`].
//!
//! [`GatewayErrorKind`]: crate::error::GatewayErrorKind

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::GatewayConfig;
use crate::error::{Result, ServiceError};
use crate::prompts::Prompt;

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions.
    System,
    /// The request.
    User,
}

/// One chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    /// Who is speaking.
    pub role: Role,
    /// Message text.
    pub content: &'a str,
}

/// Request body for `/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    /// Model identifier.
    pub model: &'a str,
    /// System then user message.
    pub messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Gateway client. Cheap to clone.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    /// Builds a client from config, reading the API key from the environment.
    ///
    /// A missing key is not an error here: each call fails with
    /// `MissingApiKey` instead, so the server can still start and serve
    /// the static routes.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let api_key = config.api_key();
        if api_key.is_none() {
            warn!(env = %config.api_key_env, "Gateway API key not set; generation requests will fail");
        }
        Self::new(config, api_key)
    }

    /// Builds a client with an explicit key.
    pub fn new(config: &GatewayConfig, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ServiceError::gateway_network)?;
        Ok(Self {
            http,
            url: config.url.clone(),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
        })
    }

    /// Model sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` and returns the completion text.
    pub async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::missing_api_key(&self.api_key_env))?;

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: Role::System,
                    content: &prompt.system,
                },
                ChatMessage {
                    role: Role::User,
                    content: &prompt.user,
                },
            ],
        };

        debug!(model = %self.model, url = %self.url, "Sending chat completion");

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "AI gateway request failed");
                ServiceError::gateway_network(e)
            })?;

        let resp = check_response(resp).await?;
        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(ServiceError::gateway_malformed)?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ServiceError::gateway_malformed("no completion in response"))
    }
}

/// Maps gateway status codes to errors; passes successful responses through.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match status.as_u16() {
        429 => {
            warn!("AI gateway rate limit exceeded");
            Err(ServiceError::rate_limited())
        }
        402 => {
            warn!("AI gateway payment required");
            Err(ServiceError::payment_required())
        }
        code => {
            let body = resp.text().await.unwrap_or_default();
            error!(status = code, body = %body, "AI gateway error");
            Err(ServiceError::gateway_status(code))
        }
    }
}
