//! End-to-end tests for the generation endpoints.
//!
//! A mock chat-completions gateway stands in for the AI provider. The Eduint
//! router runs on a real listener and is driven with `reqwest`, and the typed
//! responses are fed into the exercise sessions the learner CLI uses.

use std::net::TcpListener;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use eduint_exercise::{
    ExerciseError, GameSession, GameType, QuizSession, WritingSession, WritingTask, WritingTopic,
};
use eduint_server::{
    create_router, AppState, Config, ErrorResponse, GameContentResponse, GatewayClient,
    GatewayConfig, HealthResponse, QuestionsResponse,
};

// ============================================================================
// Test Harness
// ============================================================================

/// Helper to find an available port for testing.
fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

/// Mock gateway that answers every call with the same reply.
#[derive(Clone)]
struct MockGateway {
    status: StatusCode,
    content: String,
    calls: Arc<AtomicU32>,
    last_request: Arc<Mutex<Option<(Option<String>, Value)>>>,
}

impl MockGateway {
    fn new(status: StatusCode, content: &str) -> Self {
        Self {
            status,
            content: content.to_string(),
            calls: Arc::new(AtomicU32::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> (Option<String>, Value) {
        self.last_request
            .lock()
            .expect("lock poisoned")
            .clone()
            .expect("gateway was not called")
    }
}

async fn chat_completions(
    State(mock): State<MockGateway>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *mock.last_request.lock().expect("lock poisoned") = Some((auth, body));

    let reply = json!({
        "choices": [{ "message": { "role": "assistant", "content": mock.content } }]
    });
    (mock.status, Json(reply))
}

/// Serves `router` on a free port and returns its base URL.
async fn spawn_test_server(router: Router) -> String {
    let port = find_available_port();
    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://{addr}")
}

/// Running gateway mock plus an Eduint server wired to it.
struct TestEnv {
    base_url: String,
    gateway: MockGateway,
    http: reqwest::Client,
}

impl TestEnv {
    async fn start(status: StatusCode, content: &str) -> Self {
        Self::start_with_key(status, content, Some("test-key")).await
    }

    async fn start_with_key(status: StatusCode, content: &str, api_key: Option<&str>) -> Self {
        let gateway = MockGateway::new(status, content);
        let mock_router = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(gateway.clone());
        let gateway_url = format!("{}/v1/chat/completions", spawn_test_server(mock_router).await);

        let config = Config {
            gateway: GatewayConfig {
                url: gateway_url,
                ..GatewayConfig::default()
            },
            ..Config::default()
        };
        let client = GatewayClient::new(&config.gateway, api_key.map(str::to_string))
            .expect("Failed to build gateway client");
        let base_url = spawn_test_server(create_router(AppState::with_gateway(config, client))).await;

        Self {
            base_url,
            gateway,
            http: reqwest::Client::new(),
        }
    }

    async fn post(&self, endpoint: &str, body: Value) -> reqwest::Response {
        self.http
            .post(format!("{}/api/{endpoint}", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Request failed")
    }
}

async fn error_message(resp: reqwest::Response) -> String {
    resp.json::<ErrorResponse>()
        .await
        .expect("Failed to parse error body")
        .error
}

const QUESTIONS_REPLY: &str = r#"Here are your questions:
```json
[
  {"passage": "Bees pollinate many food crops.", "question": "What do bees do?", "options": ["Pollinate crops", "Build dams", "Eat metal", "Sing"], "correct": "Pollinate crops"},
  {"passage": "Rivers carry sediment to the sea.", "question": "Where is sediment carried?", "options": ["To the sea", "Up hills", "Into space", "Nowhere"], "correct": "To the sea"},
  {"passage": "Glaciers shape valleys over time.", "question": "What shapes valleys?", "options": ["Wind only", "Glaciers", "Birds", "Roads"], "correct": "Glaciers"}
]
```"#;

// ============================================================================
// Practice and Mock Tests
// ============================================================================

/// Answering every generated question correctly scores 100% and band 8.5.
#[tokio::test]
async fn test_practice_questions_all_correct_scores_full_marks() {
    let env = TestEnv::start(StatusCode::OK, QUESTIONS_REPLY).await;

    let resp = env
        .post("generate-practice-questions", json!({ "module": "Reading", "count": 3 }))
        .await;
    assert_eq!(resp.status(), 200);
    let questions = resp.json::<QuestionsResponse>().await.unwrap().questions;
    assert_eq!(questions.len(), 3);

    let mut quiz = QuizSession::new(questions).unwrap();
    while !quiz.is_completed() {
        let correct = quiz.current_question().correct.clone();
        quiz.select_answer(&correct).unwrap();
        quiz.next().unwrap();
    }

    let summary = quiz.summary();
    assert_eq!(summary.correct, 3);
    assert_eq!(summary.percentage, 100);
    assert!((summary.band - 8.5).abs() < f64::EPSILON);
}

/// The gateway receives a bearer token, the configured model and a
/// system/user message pair.
#[tokio::test]
async fn test_gateway_request_shape() {
    let env = TestEnv::start(StatusCode::OK, QUESTIONS_REPLY).await;
    env.post("generate-practice-questions", json!({ "module": "Listening", "count": 3 }))
        .await;

    assert_eq!(env.gateway.calls(), 1);
    let (auth, body) = env.gateway.last_request();
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(body["model"], "google/gemini-2.5-flash");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    let system = body["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("Generate 3 unique Listening questions"));
}

/// Free text from the model is a generation failure, not a crash.
#[tokio::test]
async fn test_malformed_model_output_is_500() {
    let env = TestEnv::start(StatusCode::OK, "Sorry, I can't produce a test right now.").await;

    let resp = env.post("generate-test-questions", json!({})).await;
    assert_eq!(resp.status(), 500);
    assert_eq!(
        error_message(resp).await,
        "Failed to parse generated test questions"
    );

    // The server keeps serving after a parse failure.
    let health = env
        .http
        .get(format!("{}/api/health", env.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), 200);
}

// ============================================================================
// Gateway Failures
// ============================================================================

#[tokio::test]
async fn test_rate_limit_passes_through() {
    let env = TestEnv::start(StatusCode::TOO_MANY_REQUESTS, "").await;

    let resp = env.post("generate-listening-content", json!({})).await;
    assert_eq!(resp.status(), 429);
    assert_eq!(
        error_message(resp).await,
        "Rate limit exceeded. Please try again later."
    );
}

#[tokio::test]
async fn test_payment_required_passes_through() {
    let env = TestEnv::start(StatusCode::PAYMENT_REQUIRED, "").await;

    let resp = env
        .post("generate-speaking-topic", json!({ "part": "part2" }))
        .await;
    assert_eq!(resp.status(), 402);
    assert_eq!(
        error_message(resp).await,
        "Payment required. Please add credits to your workspace."
    );
}

#[tokio::test]
async fn test_missing_api_key_never_calls_gateway() {
    let env = TestEnv::start_with_key(StatusCode::OK, QUESTIONS_REPLY, None).await;

    let health = env
        .http
        .get(format!("{}/api/health", env.base_url))
        .send()
        .await
        .unwrap()
        .json::<HealthResponse>()
        .await
        .unwrap();
    assert_eq!(health.status, "ok");

    let resp = env.post("generate-test-questions", json!({})).await;
    assert_eq!(resp.status(), 500);
    assert_eq!(error_message(resp).await, "LOVABLE_API_KEY is not configured");
    assert_eq!(env.gateway.calls(), 0);
}

// ============================================================================
// Writing and Games
// ============================================================================

/// An essay under the word minimum is rejected locally; no evaluation call
/// reaches the gateway.
#[tokio::test]
async fn test_short_essay_rejected_without_network_call() {
    let reply = r#"{"taskType": "task2", "topic": "Some people think cities should ban cars. Discuss.", "instructions": "Give reasons for your answer."}"#;
    let env = TestEnv::start(StatusCode::OK, reply).await;

    let resp = env
        .post("generate-writing-topic", json!({ "taskType": "task2" }))
        .await;
    assert_eq!(resp.status(), 200);
    let topic: WritingTopic = resp.json().await.unwrap();
    assert_eq!(topic.task_type, WritingTask::Task2);
    assert_eq!(topic.word_limit, 250);
    assert_eq!(env.gateway.calls(), 1);

    let mut session = WritingSession::new(topic);
    session.set_essay("Cars are noisy.");
    let err = session.validate_submission().unwrap_err();
    assert_eq!(
        err,
        ExerciseError::BelowWordLimit {
            required: 250,
            actual: 3
        }
    );
    assert_eq!(
        err.to_string(),
        "Your essay should be at least 250 words. Current: 3"
    );
    assert_eq!(env.gateway.calls(), 1);
}

/// Generated rounds play through to the end with full points.
#[tokio::test]
async fn test_game_content_plays_to_completion() {
    let reply = r#"[
        {"word": "Ubiquitous", "options": ["Everywhere", "Rare", "Hidden", "Ancient"], "correct": "Everywhere"},
        {"word": "Ephemeral", "options": ["Lasting", "Brief", "Heavy", "Loud"], "correct": "Brief"},
        {"word": "Candid", "options": ["Honest", "Sweet", "Hidden", "Tall"], "correct": "Honest"}
    ]"#;
    let env = TestEnv::start(StatusCode::OK, reply).await;

    let resp = env
        .post(
            "generate-game-content",
            json!({ "gameType": "Vocabulary Race", "count": 3 }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let items = resp.json::<GameContentResponse>().await.unwrap().game_content;

    let mut game = GameSession::new(GameType::VocabularyRace, items).unwrap();
    while !game.is_over() {
        let correct = game.current_item().correct.clone();
        game.answer(&correct).unwrap();
    }

    let result = game.result();
    assert_eq!(result.rounds_won, 3);
    // No time elapsed: 100 + 30 * 10 per round.
    assert_eq!(result.score, 1200);
}

/// A zero count falls back to the default and an oversized one is clamped.
#[tokio::test]
async fn test_count_defaults_and_clamps() {
    let env = TestEnv::start(StatusCode::OK, QUESTIONS_REPLY).await;

    let resp = env
        .post("generate-practice-questions", json!({ "module": "Reading", "count": 0 }))
        .await;
    assert_eq!(resp.status(), 200);
    let (_, body) = env.gateway.last_request();
    let system = body["messages"][0]["content"].as_str().unwrap().to_string();
    assert!(system.contains("Generate 5 unique Reading questions"));

    let resp = env
        .post("generate-practice-questions", json!({ "module": "Reading", "count": 500 }))
        .await;
    assert_eq!(resp.status(), 200);
    let (_, body) = env.gateway.last_request();
    let system = body["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("Generate 20 unique Reading questions"));
    assert_eq!(env.gateway.calls(), 2);
}

/// A body that is not JSON is a 500 with an error message; the gateway is
/// never called.
#[tokio::test]
async fn test_malformed_body_is_500() {
    let env = TestEnv::start(StatusCode::OK, QUESTIONS_REPLY).await;

    let resp = env
        .http
        .post(format!("{}/api/generate-game-content", env.base_url))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    assert!(error_message(resp).await.starts_with("Invalid request:"));
    assert_eq!(env.gateway.calls(), 0);
}
