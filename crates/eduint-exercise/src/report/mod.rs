//! Results reports.
//!
//! A [`ResultsReport`] captures a finished exercise. It can be rendered for
//! the terminal with [`MarkdownGenerator`] or serialized with
//! [`json::JsonGenerator`].
//!
//! # Example
//!
//! ```rust
//! use eduint_exercise::{ExerciseKind, Question, QuizSession, ResultsReport};
//! use eduint_exercise::report::MarkdownGenerator;
//!
//! let mut quiz = QuizSession::new(vec![Question::new(
//!     "Opposite of 'ancient'?",
//!     vec!["modern".into(), "old".into()],
//!     "modern",
//! )])
//! .unwrap();
//! quiz.select_answer("modern").unwrap();
//! quiz.next().unwrap();
//!
//! let report = ResultsReport::from_quiz(ExerciseKind::Practice, "Reading Practice", &quiz);
//! let markdown = MarkdownGenerator::new(&report).generate();
//! assert!(markdown.contains("| Score | 1/1 (100%) |"));
//! ```

pub mod json;
mod markdown;

pub use markdown::MarkdownGenerator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::band::ScoreSummary;
use crate::game::{GameResult, GameSession};
use crate::model::{SpeakingEvaluation, SpeakingTopic, WritingEvaluation, WritingTopic};
use crate::quiz::{QuizSession, ReviewItem};

// ============================================================================
// ExerciseKind
// ============================================================================

/// Which exercise produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Module practice quiz.
    Practice,
    /// Timed mock test.
    MockTest,
    /// Listening exercise.
    Listening,
    /// Mini-game.
    Game,
    /// Essay.
    Writing,
    /// Spoken response.
    Speaking,
}

impl ExerciseKind {
    /// Human-readable label.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Practice => "Practice quiz",
            Self::MockTest => "Mock test",
            Self::Listening => "Listening practice",
            Self::Game => "Game",
            Self::Writing => "Writing evaluation",
            Self::Speaking => "Speaking evaluation",
        }
    }
}

impl std::fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// What the learner achieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Locally scored multiple-choice exercise.
    Quiz {
        /// Score and band.
        summary: ScoreSummary,
        /// Per-question review.
        review: Vec<ReviewItem>,
    },
    /// Game score.
    Game(GameResult),
    /// Essay assessment.
    Writing(WritingEvaluation),
    /// Spoken response assessment.
    Speaking(SpeakingEvaluation),
}

// ============================================================================
// ResultsReport
// ============================================================================

/// A finished exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsReport {
    /// Heading, e.g. "Reading Practice".
    pub title: String,
    /// Which exercise.
    pub kind: ExerciseKind,
    /// Result details.
    pub outcome: Outcome,
    /// Time spent, in seconds.
    pub duration_seconds: u64,
    /// When the exercise finished.
    pub completed_at: DateTime<Utc>,
}

impl ResultsReport {
    /// Builds a report from a quiz; the quiz need not be completed.
    #[must_use]
    pub fn from_quiz(kind: ExerciseKind, title: impl Into<String>, quiz: &QuizSession) -> Self {
        let completed_at = quiz.completed_at().unwrap_or_else(Utc::now);
        Self {
            title: title.into(),
            kind,
            outcome: Outcome::Quiz {
                summary: quiz.summary(),
                review: quiz.review(),
            },
            duration_seconds: seconds_between(quiz.started_at(), completed_at),
            completed_at,
        }
    }

    /// Builds a report from a game.
    #[must_use]
    pub fn from_game(game: &GameSession, duration_seconds: u64) -> Self {
        Self {
            title: game.game().to_string(),
            kind: ExerciseKind::Game,
            outcome: Outcome::Game(game.result()),
            duration_seconds,
            completed_at: Utc::now(),
        }
    }

    /// Builds a report from an essay assessment.
    #[must_use]
    pub fn from_writing(
        topic: &WritingTopic,
        evaluation: WritingEvaluation,
        duration_seconds: u64,
    ) -> Self {
        Self {
            title: format!("Writing {}", topic.task_type),
            kind: ExerciseKind::Writing,
            outcome: Outcome::Writing(evaluation),
            duration_seconds,
            completed_at: Utc::now(),
        }
    }

    /// Builds a report from a spoken response assessment.
    #[must_use]
    pub fn from_speaking(
        topic: &SpeakingTopic,
        evaluation: SpeakingEvaluation,
        duration_seconds: u64,
    ) -> Self {
        Self {
            title: format!("Speaking {}", topic.part),
            kind: ExerciseKind::Speaking,
            outcome: Outcome::Speaking(evaluation),
            duration_seconds,
            completed_at: Utc::now(),
        }
    }

    /// Overrides the completion time.
    #[must_use]
    pub fn with_completed_at(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed_at = completed_at;
        self
    }

    /// Band achieved, if the exercise yields one.
    #[must_use]
    pub fn band(&self) -> Option<f64> {
        match &self.outcome {
            Outcome::Quiz { summary, .. } => Some(summary.band),
            Outcome::Writing(e) => Some(e.overall_band),
            Outcome::Speaking(e) => Some(e.overall_band),
            Outcome::Game(_) => None,
        }
    }
}

#[allow(clippy::cast_sign_loss)]
fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - start).num_seconds().max(0) as u64
}
