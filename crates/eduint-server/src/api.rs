//! HTTP API for the generation endpoints.
//!
//! # Endpoints
//!
//! - `POST /api/generate-practice-questions` - `{ module, count? }` -> `{ questions }`
//! - `POST /api/generate-test-questions` - 15-question mock test
//! - `POST /api/generate-game-content` - `{ gameType, count? }` -> `{ gameContent }`
//! - `POST /api/generate-listening-content` - transcript and questions
//! - `POST /api/generate-writing-topic` - `{ taskType }`
//! - `POST /api/evaluate-writing` - `{ topic, essay, taskType }`
//! - `POST /api/generate-speaking-topic` - `{ part }`
//! - `POST /api/evaluate-speaking` - `{ transcript, topic, part }`
//! - `GET /api/catalog` - static catalog content
//! - `GET /api/health` - liveness
//!
//! Failures are `{ "error": "..." }` with the status from
//! [`ServiceError::status`].
//!
//! # Example
//!
//! ```no_run
//! use eduint_server::{create_router, AppState, Config};
//!
//! # async fn example() -> eduint_server::Result<()> {
//! let state = AppState::new(Config::default())?;
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await.unwrap();
//! axum::serve(listener, router).await.unwrap();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use eduint_exercise::{
    Catalog, GameItem, GameType, ListeningContent, Module, Question, SpeakingEvaluation,
    SpeakingPart, SpeakingTopic, WritingEvaluation, WritingTask, WritingTopic,
};

use crate::error::ServiceError;
use crate::gateway::GatewayClient;
use crate::generate::Generator;
use crate::Config;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /api/generate-practice-questions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PracticeQuestionsRequest {
    /// Module name; unknown or missing means Reading.
    #[serde(default)]
    pub module: Option<String>,
    /// Number of questions; defaults to `generation.practiceCount`.
    #[serde(default)]
    pub count: Option<u32>,
}

/// Body of `POST /api/generate-game-content`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameContentRequest {
    /// Game name; unknown or missing means Vocabulary Race.
    #[serde(default)]
    pub game_type: Option<String>,
    /// Number of rounds; defaults to `generation.gameCount`.
    #[serde(default)]
    pub count: Option<u32>,
}

/// Body of `POST /api/generate-writing-topic`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingTopicRequest {
    /// "task1" or "task2"; anything else means Task 2.
    #[serde(default)]
    pub task_type: Option<String>,
}

/// Body of `POST /api/evaluate-writing`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateWritingRequest {
    /// The prompt the essay answers.
    pub topic: String,
    /// Essay text.
    pub essay: String,
    /// "task1" or "task2".
    #[serde(default)]
    pub task_type: Option<String>,
}

/// Body of `POST /api/generate-speaking-topic`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakingTopicRequest {
    /// "part1", "part2" or "part3"; anything else means Part 3.
    #[serde(default)]
    pub part: Option<String>,
}

/// Body of `POST /api/evaluate-speaking`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateSpeakingRequest {
    /// Recognized speech.
    pub transcript: String,
    /// Topic the candidate spoke about.
    pub topic: String,
    /// Which part of the test.
    #[serde(default)]
    pub part: Option<String>,
}

/// Response carrying generated questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionsResponse {
    /// Generated questions.
    pub questions: Vec<Question>,
}

/// Response carrying generated game rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameContentResponse {
    /// Generated rounds.
    pub game_content: Vec<GameItem>,
}

/// Response body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Model the gateway is asked for.
    pub model: String,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub error: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
///
/// Immutable: the server keeps nothing between requests.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration the server started with.
    pub config: Config,
    /// Content generator.
    pub generator: Generator,
}

impl AppState {
    /// Creates state from config, reading the gateway key from the environment.
    pub fn new(config: Config) -> crate::Result<Self> {
        let gateway = GatewayClient::from_config(&config.gateway)?;
        Ok(Self::with_gateway(config, gateway))
    }

    /// Creates state with an explicit gateway client.
    #[must_use]
    pub fn with_gateway(config: Config, gateway: GatewayClient) -> Self {
        let generator = Generator::new(gateway, config.generation.clone());
        Self { config, generator }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ServiceError::invalid_request(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        match &self.0 {
            ServiceError::ParseError { what, detail } => {
                error!(what, detail = %detail, "Failed to parse model output");
            }
            err if status == StatusCode::INTERNAL_SERVER_ERROR => {
                error!(error = %err, "Generation request failed");
            }
            err => warn!(status = status.as_u16(), error = %err, "Generation request rejected"),
        }

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all API endpoints.
///
/// Routes live under `/api`, with permissive CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/generate-practice-questions", post(handle_practice_questions))
        .route("/generate-test-questions", post(handle_test_questions))
        .route("/generate-game-content", post(handle_game_content))
        .route("/generate-listening-content", post(handle_listening_content))
        .route("/generate-writing-topic", post(handle_writing_topic))
        .route("/evaluate-writing", post(handle_evaluate_writing))
        .route("/generate-speaking-topic", post(handle_speaking_topic))
        .route("/evaluate-speaking", post(handle_evaluate_speaking))
        .route("/catalog", get(handle_catalog))
        .route("/health", get(handle_health));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

async fn handle_practice_questions(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PracticeQuestionsRequest>, JsonRejection>,
) -> ApiResult<QuestionsResponse> {
    let Json(request) = payload?;
    let module = request
        .module
        .as_deref()
        .map_or(Module::Reading, Module::from_name_or_default);
    let generator = &state.generator;
    let count = generator.resolve_count(request.count, generator.limits().practice_count);

    let questions = generator.practice_questions(module, count).await?;
    Ok(Json(QuestionsResponse { questions }))
}

async fn handle_test_questions(State(state): State<Arc<AppState>>) -> ApiResult<QuestionsResponse> {
    let questions = state.generator.test_questions().await?;
    Ok(Json(QuestionsResponse { questions }))
}

async fn handle_game_content(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GameContentRequest>, JsonRejection>,
) -> ApiResult<GameContentResponse> {
    let Json(request) = payload?;
    let game = request
        .game_type
        .as_deref()
        .map_or(GameType::VocabularyRace, GameType::from_name_or_default);
    let generator = &state.generator;
    let count = generator.resolve_count(request.count, generator.limits().game_count);

    let game_content = generator.game_content(game, count).await?;
    Ok(Json(GameContentResponse { game_content }))
}

async fn handle_listening_content(
    State(state): State<Arc<AppState>>,
) -> ApiResult<ListeningContent> {
    Ok(Json(state.generator.listening_content().await?))
}

async fn handle_writing_topic(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WritingTopicRequest>, JsonRejection>,
) -> ApiResult<WritingTopic> {
    let Json(request) = payload?;
    let task = request
        .task_type
        .as_deref()
        .map_or(WritingTask::Task2, WritingTask::from_name_or_default);
    Ok(Json(state.generator.writing_topic(task).await?))
}

async fn handle_evaluate_writing(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EvaluateWritingRequest>, JsonRejection>,
) -> ApiResult<WritingEvaluation> {
    let Json(request) = payload?;
    let task = request
        .task_type
        .as_deref()
        .map_or(WritingTask::Task2, WritingTask::from_name_or_default);
    let evaluation = state
        .generator
        .evaluate_writing(&request.topic, &request.essay, task)
        .await?;
    Ok(Json(evaluation))
}

async fn handle_speaking_topic(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeakingTopicRequest>, JsonRejection>,
) -> ApiResult<SpeakingTopic> {
    let Json(request) = payload?;
    let part = request
        .part
        .as_deref()
        .map_or(SpeakingPart::Part3, SpeakingPart::from_name_or_default);
    Ok(Json(state.generator.speaking_topic(part).await?))
}

async fn handle_evaluate_speaking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EvaluateSpeakingRequest>, JsonRejection>,
) -> ApiResult<SpeakingEvaluation> {
    let Json(request) = payload?;
    let part = request
        .part
        .as_deref()
        .map_or(SpeakingPart::Part3, SpeakingPart::from_name_or_default);
    let evaluation = state
        .generator
        .evaluate_speaking(&request.transcript, &request.topic, part)
        .await?;
    Ok(Json(evaluation))
}

async fn handle_catalog() -> Json<&'static Catalog> {
    Json(Catalog::get())
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.generator.gateway_model().to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
