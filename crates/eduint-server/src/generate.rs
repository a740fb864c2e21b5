//! Content generation: prompt, call the gateway, parse the reply.
//!
//! [`Generator`] holds one operation per endpoint. Every operation makes
//! exactly one gateway call and returns a typed record; the HTTP layer only
//! decodes requests and encodes results.

use chrono::Utc;
use tracing::{debug, info, warn};

use eduint_exercise::{
    is_valid_band, word_count, GameItem, GameType, ListeningContent, Module, Question,
    SpeakingEvaluation, SpeakingPart, SpeakingTopic, WritingEvaluation, WritingTask, WritingTopic,
};

use crate::config::GenerationConfig;
use crate::error::{Result, ServiceError};
use crate::extract::{extract_array, extract_object};
use crate::gateway::GatewayClient;
use crate::prompts;

/// Generates exercise content through the gateway.
#[derive(Debug, Clone)]
pub struct Generator {
    gateway: GatewayClient,
    limits: GenerationConfig,
}

impl Generator {
    /// Creates a generator.
    #[must_use]
    pub const fn new(gateway: GatewayClient, limits: GenerationConfig) -> Self {
        Self { gateway, limits }
    }

    /// Generation defaults and bounds.
    #[must_use]
    pub const fn limits(&self) -> &GenerationConfig {
        &self.limits
    }

    /// Model the gateway is asked for.
    #[must_use]
    pub fn gateway_model(&self) -> &str {
        self.gateway.model()
    }

    /// Resolves a requested count: missing or zero uses `default`, and
    /// anything above `maxCount` is clamped to it.
    #[must_use]
    pub fn resolve_count(&self, requested: Option<u32>, default: u32) -> u32 {
        let count = requested.filter(|&c| c > 0).unwrap_or(default);
        if count > self.limits.max_count {
            debug!(requested = count, max = self.limits.max_count, "Clamping count");
        }
        count.min(self.limits.max_count)
    }

    /// Practice questions for a module.
    pub async fn practice_questions(&self, module: Module, count: u32) -> Result<Vec<Question>> {
        info!(module = %module, count, "Generating practice questions");
        let reply = self
            .gateway
            .complete(&prompts::practice_questions(module, count))
            .await?;
        let questions: Vec<Question> = extract_array(&reply, "generated questions")?;
        check_questions(&questions);
        Ok(questions)
    }

    /// A fifteen-question mock test.
    pub async fn test_questions(&self) -> Result<Vec<Question>> {
        info!("Generating mock test");
        let reply = self
            .gateway
            .complete(&prompts::mock_test(timestamp()))
            .await?;
        let questions: Vec<Question> = extract_array(&reply, "generated test questions")?;
        if questions.len() != prompts::MOCK_TEST_QUESTIONS as usize {
            warn!(
                expected = prompts::MOCK_TEST_QUESTIONS,
                actual = questions.len(),
                "Mock test has an unexpected number of questions"
            );
        }
        check_questions(&questions);
        Ok(questions)
    }

    /// Rounds for a mini-game.
    pub async fn game_content(&self, game: GameType, count: u32) -> Result<Vec<GameItem>> {
        info!(game = %game, count, "Generating game content");
        let reply = self
            .gateway
            .complete(&prompts::game_content(game, count))
            .await?;
        let items: Vec<GameItem> = extract_array(&reply, "generated game content")?;
        let malformed = items
            .iter()
            .filter(|i| i.prompt().is_empty() || !i.options.contains(&i.correct))
            .count();
        if malformed > 0 {
            warn!(game = %game, malformed, "Game content has malformed rounds");
        }
        Ok(items)
    }

    /// A listening transcript with questions.
    pub async fn listening_content(&self) -> Result<ListeningContent> {
        info!("Generating listening content");
        let reply = self
            .gateway
            .complete(&prompts::listening_content(timestamp()))
            .await?;
        let content: ListeningContent = extract_object(&reply, "AI response")?;
        check_questions(&content.questions);
        Ok(content)
    }

    /// A writing prompt; limits the model omitted are filled per task.
    pub async fn writing_topic(&self, task: WritingTask) -> Result<WritingTopic> {
        info!(task = task.as_str(), "Generating writing topic");
        let reply = self
            .gateway
            .complete(&prompts::writing_topic(task, timestamp()))
            .await?;
        let topic: WritingTopic = extract_object(&reply, "AI response")?;
        Ok(topic.normalized(task))
    }

    /// Assesses an essay.
    pub async fn evaluate_writing(
        &self,
        topic: &str,
        essay: &str,
        task: WritingTask,
    ) -> Result<WritingEvaluation> {
        if essay.trim().is_empty() {
            return Err(ServiceError::invalid_request("essay must not be empty"));
        }
        let words = word_count(essay);
        info!(task = task.as_str(), words, "Evaluating essay");
        let reply = self
            .gateway
            .complete(&prompts::evaluate_writing(task, topic, essay, words))
            .await?;
        let evaluation: WritingEvaluation = extract_object(&reply, "AI response")?;
        check_bands(
            "writing",
            evaluation
                .criteria()
                .iter()
                .map(|(_, c)| c.score)
                .chain(std::iter::once(evaluation.overall_band)),
        );
        Ok(evaluation)
    }

    /// A speaking topic for one part.
    pub async fn speaking_topic(&self, part: SpeakingPart) -> Result<SpeakingTopic> {
        info!(part = part.as_str(), "Generating speaking topic");
        let reply = self
            .gateway
            .complete(&prompts::speaking_topic(part, timestamp()))
            .await?;
        let mut topic: SpeakingTopic = extract_object(&reply, "AI response")?;
        topic.part = part;
        Ok(topic)
    }

    /// Assesses a spoken response from its transcript.
    pub async fn evaluate_speaking(
        &self,
        transcript: &str,
        topic: &str,
        part: SpeakingPart,
    ) -> Result<SpeakingEvaluation> {
        if transcript.trim().is_empty() {
            return Err(ServiceError::invalid_request("transcript must not be empty"));
        }
        info!(part = part.as_str(), words = word_count(transcript), "Evaluating speaking response");
        let reply = self
            .gateway
            .complete(&prompts::evaluate_speaking(part, topic, transcript))
            .await?;
        let evaluation: SpeakingEvaluation = extract_object(&reply, "AI response")?;
        check_bands(
            "speaking",
            evaluation
                .criteria()
                .iter()
                .map(|(_, c)| c.score)
                .chain(std::iter::once(evaluation.overall_band)),
        );
        Ok(evaluation)
    }
}

fn timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

fn check_questions(questions: &[Question]) {
    let malformed = questions.iter().filter(|q| !q.is_well_formed()).count();
    if malformed > 0 {
        warn!(
            malformed,
            total = questions.len(),
            "Generated questions whose answer is not among the options"
        );
    }
}

fn check_bands(what: &str, bands: impl Iterator<Item = f64>) {
    let invalid: Vec<f64> = bands.filter(|b| !is_valid_band(*b)).collect();
    if !invalid.is_empty() {
        warn!(what, ?invalid, "Evaluation contains out-of-range band scores");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn generator_without_key() -> Generator {
        let gateway = GatewayClient::new(&GatewayConfig::default(), None).unwrap();
        Generator::new(gateway, GenerationConfig::default())
    }

    #[test]
    fn test_resolve_count_defaults_and_clamps() {
        let generator = generator_without_key();
        assert_eq!(generator.resolve_count(None, 5), 5);
        assert_eq!(generator.resolve_count(Some(0), 5), 5);
        assert_eq!(generator.resolve_count(Some(20), 5), 20);
        assert_eq!(generator.resolve_count(Some(21), 5), 20);
        assert_eq!(generator.resolve_count(Some(500), 3), 20);
    }

    #[tokio::test]
    async fn test_blank_essay_rejected_before_gateway() {
        let generator = generator_without_key();
        let err = generator
            .evaluate_writing("topic", "   ", WritingTask::Task2)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_blank_transcript_rejected_before_gateway() {
        let generator = generator_without_key();
        let err = generator
            .evaluate_speaking("", "topic", SpeakingPart::Part1)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_missing_key_surfaces_per_request() {
        let generator = generator_without_key();
        let err = generator.test_questions().await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingApiKey { .. }));
    }
}
