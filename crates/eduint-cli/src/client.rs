//! HTTP client for the generation endpoints.
//!
//! One request at a time: a second call while another is in flight fails
//! immediately instead of queueing behind it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;

use eduint_exercise::{
    GameItem, GameType, ListeningContent, Module, Question, SpeakingEvaluation, SpeakingPart,
    SpeakingTopic, WritingEvaluation, WritingTask, WritingTopic,
};
use eduint_server::{
    ErrorResponse, EvaluateSpeakingRequest, EvaluateWritingRequest, GameContentRequest,
    GameContentResponse, PracticeQuestionsRequest, QuestionsResponse, SpeakingTopicRequest,
    WritingTopicRequest,
};

/// Generation requests can take a while; the gateway itself times out first.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Client for a running `eduint serve`.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when dropped.
#[derive(Debug)]
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ApiClient {
    /// Creates a client for the server at `base_url` (e.g. `http://127.0.0.1:3000`).
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            in_flight: AtomicBool::new(false),
        })
    }

    /// Server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn begin(&self) -> anyhow::Result<InFlight<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            bail!("A request is already in progress");
        }
        Ok(InFlight(&self.in_flight))
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> anyhow::Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let _guard = self.begin()?;
        let url = format!("{}/api/{endpoint}", self.base_url);
        tracing::debug!(url = %url, "Calling generation endpoint");

        let resp = self.http.post(&url).json(body).send().await.map_err(|e| {
            tracing::debug!(error = %e, "Request failed");
            anyhow!(
                "Could not reach the Eduint server at {}\n\nSuggestion: Start it with `eduint serve` or pass --server",
                self.base_url
            )
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("Server returned {status}"));
            tracing::warn!(status = status.as_u16(), endpoint, "Generation failed");
            bail!(message);
        }

        resp.json()
            .await
            .with_context(|| format!("Unexpected response from {endpoint}"))
    }

    /// `POST /api/generate-practice-questions`.
    pub async fn practice_questions(
        &self,
        module: Module,
        count: Option<u32>,
    ) -> anyhow::Result<Vec<Question>> {
        let body = PracticeQuestionsRequest {
            module: Some(module.name().to_string()),
            count,
        };
        let resp: QuestionsResponse = self.post("generate-practice-questions", &body).await?;
        Ok(resp.questions)
    }

    /// `POST /api/generate-test-questions`.
    pub async fn test_questions(&self) -> anyhow::Result<Vec<Question>> {
        let resp: QuestionsResponse = self
            .post("generate-test-questions", &serde_json::json!({}))
            .await?;
        Ok(resp.questions)
    }

    /// `POST /api/generate-game-content`.
    pub async fn game_content(
        &self,
        game: GameType,
        count: Option<u32>,
    ) -> anyhow::Result<Vec<GameItem>> {
        let body = GameContentRequest {
            game_type: Some(game.name().to_string()),
            count,
        };
        let resp: GameContentResponse = self.post("generate-game-content", &body).await?;
        Ok(resp.game_content)
    }

    /// `POST /api/generate-listening-content`.
    pub async fn listening_content(&self) -> anyhow::Result<ListeningContent> {
        self.post("generate-listening-content", &serde_json::json!({}))
            .await
    }

    /// `POST /api/generate-writing-topic`.
    pub async fn writing_topic(&self, task: WritingTask) -> anyhow::Result<WritingTopic> {
        let body = WritingTopicRequest {
            task_type: Some(task.as_str().to_string()),
        };
        self.post("generate-writing-topic", &body).await
    }

    /// `POST /api/evaluate-writing`.
    pub async fn evaluate_writing(
        &self,
        topic: &str,
        essay: &str,
        task: WritingTask,
    ) -> anyhow::Result<WritingEvaluation> {
        let body = EvaluateWritingRequest {
            topic: topic.to_string(),
            essay: essay.to_string(),
            task_type: Some(task.as_str().to_string()),
        };
        self.post("evaluate-writing", &body).await
    }

    /// `POST /api/generate-speaking-topic`.
    pub async fn speaking_topic(&self, part: SpeakingPart) -> anyhow::Result<SpeakingTopic> {
        let body = SpeakingTopicRequest {
            part: Some(part.as_str().to_string()),
        };
        self.post("generate-speaking-topic", &body).await
    }

    /// `POST /api/evaluate-speaking`.
    pub async fn evaluate_speaking(
        &self,
        transcript: &str,
        topic: &str,
        part: SpeakingPart,
    ) -> anyhow::Result<SpeakingEvaluation> {
        let body = EvaluateSpeakingRequest {
            transcript: transcript.to_string(),
            topic: topic.to_string(),
            part: Some(part.as_str().to_string()),
        };
        self.post("evaluate-speaking", &body).await
    }
}
