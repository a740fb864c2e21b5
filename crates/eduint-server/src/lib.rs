//! Eduint generation server
//!
//! Stateless HTTP endpoints that turn exercise requests into prompts for the
//! AI chat-completions gateway and relay the parsed JSON back.
//!
//! # Modules
//!
//! - [`api`] - axum router and handlers
//! - [`config`] - `eduint.json` loading and validation
//! - [`error`] - Error taxonomy and HTTP status mapping
//! - [`gateway`] - Chat-completions client
//! - [`generate`] - One operation per endpoint
//! - [`prompts`] - Prompt templates
//! - [`extract`] - JSON extraction from model replies

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod generate;
pub mod prompts;

pub use api::{
    create_router, AppState, ErrorResponse, EvaluateSpeakingRequest, EvaluateWritingRequest,
    GameContentRequest, GameContentResponse, HealthResponse, PracticeQuestionsRequest,
    QuestionsResponse, SpeakingTopicRequest, WritingTopicRequest,
};
pub use config::{AuthConfig, Config, GatewayConfig, GenerationConfig, ServerConfig};
pub use error::{GatewayErrorKind, Result, ServiceError};
pub use gateway::GatewayClient;
pub use generate::Generator;
pub use prompts::Prompt;
