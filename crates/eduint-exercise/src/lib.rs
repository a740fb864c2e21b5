//! Eduint exercise domain
//!
//! Records exchanged with the content generator, the interactive sessions
//! that walk them, and local scoring.
//!
//! # Modules
//!
//! - [`model`] - Question, game, writing, speaking and evaluation records
//! - [`band`] - Percentage to band-score mapping
//! - [`quiz`] - Sequential multiple-choice session with next/previous state
//! - [`timer`] - One-second countdowns
//! - [`game`] - Timed game rounds with points
//! - [`writing`], [`speaking`], [`listening`] - Module-specific sessions
//! - [`site`] - Page map and module routing
//! - [`catalog`] - Static marketing and catalog content
//! - [`report`] - Results reports rendered as Markdown or JSON
//!
//! # Example
//!
//! ```rust
//! use eduint_exercise::{Question, QuizSession};
//!
//! let questions = vec![Question::new(
//!     "Which word means 'happy'?",
//!     vec!["glad".into(), "sad".into(), "late".into(), "tall".into()],
//!     "glad",
//! )];
//!
//! let mut quiz = QuizSession::new(questions).unwrap();
//! quiz.select_answer("glad").unwrap();
//! quiz.next().unwrap();
//!
//! let summary = quiz.summary();
//! assert_eq!(summary.percentage, 100);
//! assert_eq!(summary.band, 8.5);
//! ```

pub mod band;
pub mod catalog;
pub mod game;
pub mod listening;
pub mod model;
pub mod quiz;
pub mod report;
pub mod site;
pub mod speaking;
pub mod timer;
pub mod writing;

use thiserror::Error;

pub use band::{band_for_percentage, is_valid_band, ScoreSummary, BAND_THRESHOLDS, FLOOR_BAND};
pub use catalog::Catalog;
pub use game::{GameOutcome, GameResult, GameSession, POINTS_BASE, POINTS_PER_SECOND, WRONG_ANSWER_PENALTY};
pub use listening::{ListeningSession, Playback};
pub use model::{
    word_count, CriterionScore, GameItem, GameType, ListeningContent, Module, Question, Section,
    SpeakingEvaluation, SpeakingPart, SpeakingTopic, WritingEvaluation, WritingTask, WritingTopic,
};
pub use quiz::{Advance, QuizSession, QuizStatus, ReviewItem};
pub use report::{ExerciseKind, Outcome, ResultsReport};
pub use site::{practice_page, Page};
pub use speaking::{RecorderState, SpeakingSession};
pub use timer::{format_clock, Countdown, Tick, GAME_ROUND_SECONDS, MOCK_TEST_SECONDS};
pub use writing::WritingSession;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised by exercise sessions.
///
/// Messages are written for the learner; front-ends show them verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExerciseError {
    /// The generator returned nothing to work through.
    #[error("No {what} generated")]
    EmptyExercise {
        /// What was expected (e.g. "questions", "game content").
        what: &'static str,
    },

    /// `next` was requested before the current question was answered.
    #[error("Please select an answer")]
    NoAnswerSelected,

    /// The chosen option is not one of the current question's options.
    #[error("'{option}' is not one of the available options")]
    UnknownOption {
        /// The rejected option text.
        option: String,
    },

    /// The session is not in a state that accepts the operation.
    #[error("Invalid state transition: cannot {action} while {state}")]
    InvalidTransition {
        /// The attempted action.
        action: &'static str,
        /// The current state.
        state: String,
    },

    /// Essay submission with no text.
    #[error("Please write your essay first")]
    EmptyEssay,

    /// Essay submission below the topic's word minimum.
    #[error("Your essay should be at least {required} words. Current: {actual}")]
    BelowWordLimit {
        /// Minimum words required by the topic.
        required: u32,
        /// Words actually written.
        actual: usize,
    },

    /// Speaking submission with no recognised speech.
    #[error("No transcript available. Please ensure your microphone is working.")]
    EmptyTranscript,

    /// Failed to serialize a report.
    #[error("failed to serialize report: {0}")]
    Serialization(String),

    /// Failed to write a report file.
    #[error("I/O error: {0}")]
    Io(String),
}

impl ExerciseError {
    /// Creates a new `InvalidTransition` error.
    #[must_use]
    pub fn invalid_transition(action: &'static str, state: impl std::fmt::Display) -> Self {
        Self::InvalidTransition {
            action,
            state: state.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExerciseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ExerciseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for exercise operations.
pub type Result<T> = std::result::Result<T, ExerciseError>;
