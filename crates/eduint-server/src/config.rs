//! Configuration for the Eduint server and learner client.
//!
//! Settings live in `eduint.json` (camelCase keys). Every field has a
//! default, so a missing file or a partial file is fine. Secrets are never
//! stored in the file: it names the environment variables that hold them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "eduint.json";

fn default_gateway_url() -> String {
    "https://ai.gateway.lovable.dev/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "LOVABLE_API_KEY".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

const fn default_practice_count() -> u32 {
    5
}

const fn default_game_count() -> u32 {
    3
}

const fn default_max_count() -> u32 {
    20
}

fn default_auth_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_anon_key_env() -> String {
    "EDUINT_AUTH_ANON_KEY".to_string()
}

fn default_redirect_to() -> String {
    "http://localhost:8080/".to_string()
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    1000
}

const fn default_max_delay_ms() -> u64 {
    4000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

// ============================================================================
// Config
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// AI gateway connection.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Content generation defaults.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Authentication provider.
    #[serde(default)]
    pub auth: AuthConfig,

    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Loads `eduint.json` from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            ServiceError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `eduint.json` from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// `ConfigParseError` for unreadable or invalid JSON,
    /// `ConfigValidationError` for out-of-range values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(ServiceError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ServiceError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.gateway.url.trim().is_empty() {
            return Err(ServiceError::config_validation(
                "gateway.url must not be empty",
                "Set gateway.url to the chat-completions endpoint in your eduint.json",
            ));
        }

        if self.gateway.model.trim().is_empty() {
            return Err(ServiceError::config_validation(
                "gateway.model must not be empty",
                "Set gateway.model (e.g. \"google/gemini-2.5-flash\") in your eduint.json",
            ));
        }

        if self.gateway.timeout_secs == 0 {
            return Err(ServiceError::config_validation(
                "gateway.timeoutSecs must be greater than 0",
                "Set gateway.timeoutSecs to at least 1 second in your eduint.json",
            ));
        }

        let generation = &self.generation;
        if generation.max_count == 0 {
            return Err(ServiceError::config_validation(
                "generation.maxCount must be greater than 0",
                "Set generation.maxCount to at least 1 in your eduint.json",
            ));
        }

        for (name, value) in [
            ("practiceCount", generation.practice_count),
            ("gameCount", generation.game_count),
        ] {
            if value == 0 || value > generation.max_count {
                return Err(ServiceError::config_validation(
                    format!(
                        "generation.{name} must be between 1 and {}",
                        generation.max_count
                    ),
                    format!("Set generation.{name} within range in your eduint.json"),
                ));
            }
        }

        if self.auth.url.trim().is_empty() {
            return Err(ServiceError::config_validation(
                "auth.url must not be empty",
                "Set auth.url to your authentication provider's base URL in your eduint.json",
            ));
        }

        if self.auth.max_attempts == 0 {
            return Err(ServiceError::config_validation(
                "auth.maxAttempts must be greater than 0",
                "Set auth.maxAttempts to at least 1 in your eduint.json",
            ));
        }

        if self.auth.base_delay_ms > self.auth.max_delay_ms {
            return Err(ServiceError::config_validation(
                "auth.baseDelayMs must not exceed auth.maxDelayMs",
                "Lower auth.baseDelayMs or raise auth.maxDelayMs in your eduint.json",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Sections
// ============================================================================

/// AI gateway connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Chat-completions endpoint.
    #[serde(default = "default_gateway_url")]
    pub url: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the bearer token.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Reads the API key from the configured environment variable.
    ///
    /// Empty values count as unset.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Content generation defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Practice questions when the request omits `count`.
    #[serde(default = "default_practice_count")]
    pub practice_count: u32,

    /// Game rounds when the request omits `count`.
    #[serde(default = "default_game_count")]
    pub game_count: u32,

    /// Requested counts above this are clamped to it.
    #[serde(default = "default_max_count")]
    pub max_count: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            practice_count: default_practice_count(),
            game_count: default_game_count(),
            max_count: default_max_count(),
        }
    }
}

/// Authentication provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Provider base URL (the `/auth/v1` paths are appended).
    #[serde(default = "default_auth_url")]
    pub url: String,

    /// Environment variable holding the public anon key.
    #[serde(default = "default_anon_key_env")]
    pub anon_key_env: String,

    /// Where OAuth sign-in returns to.
    #[serde(default = "default_redirect_to")]
    pub redirect_to: String,

    /// Attempts per call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound on any retry delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: default_auth_url(),
            anon_key_env: default_anon_key_env(),
            redirect_to: default_redirect_to(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl AuthConfig {
    /// Reads the anon key; an unset variable yields an empty key.
    #[must_use]
    pub fn anon_key(&self) -> String {
        std::env::var(&self.anon_key_env).unwrap_or_default()
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port; also the port the learner client talks to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL the learner client uses.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Tests
// ============================================================================
