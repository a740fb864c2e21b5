//! Timed essay session.

use crate::model::{word_count, WritingEvaluation, WritingTopic};
use crate::timer::{Countdown, Tick};
use crate::{ExerciseError, Result};

/// An essay being written against a generated topic.
///
/// The countdown starts when the learner asks for it or types the first
/// character, and stops on submission. Running out of time does not
/// submit; the essay stays editable.
#[derive(Debug, Clone)]
pub struct WritingSession {
    topic: WritingTopic,
    essay: String,
    countdown: Countdown,
    evaluation: Option<WritingEvaluation>,
}

impl WritingSession {
    /// Opens a session with a paused countdown of the topic's time limit.
    #[must_use]
    pub fn new(topic: WritingTopic) -> Self {
        let countdown = Countdown::new(topic.time_limit.saturating_mul(60));
        Self {
            topic,
            essay: String::new(),
            countdown,
            evaluation: None,
        }
    }

    /// The topic being answered.
    #[must_use]
    pub const fn topic(&self) -> &WritingTopic {
        &self.topic
    }

    /// Essay text so far.
    #[must_use]
    pub fn essay(&self) -> &str {
        &self.essay
    }

    /// Words written so far.
    #[must_use]
    pub fn word_count(&self) -> usize {
        word_count(&self.essay)
    }

    /// Seconds left.
    #[must_use]
    pub const fn time_left(&self) -> u32 {
        self.countdown.remaining()
    }

    /// Returns `true` while the countdown runs.
    #[must_use]
    pub const fn is_timer_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// Starts the countdown.
    pub fn start_timer(&mut self) {
        if !self.countdown.is_expired() {
            self.countdown.start();
        }
    }

    /// Replaces the essay text; the first non-empty edit starts the timer.
    pub fn set_essay(&mut self, text: impl Into<String>) {
        self.essay = text.into();
        if !self.essay.is_empty() && !self.countdown.is_running() && self.evaluation.is_none() {
            self.start_timer();
        }
    }

    /// Appends a line of text.
    pub fn push_line(&mut self, line: &str) {
        let mut essay = std::mem::take(&mut self.essay);
        if !essay.is_empty() {
            essay.push('\n');
        }
        essay.push_str(line);
        self.set_essay(essay);
    }

    /// Advances the countdown.
    pub fn tick(&mut self) -> Tick {
        self.countdown.tick()
    }

    /// Checks the essay may be sent for evaluation and stops the timer.
    ///
    /// # Errors
    ///
    /// `EmptyEssay` for blank text, `BelowWordLimit` when shorter than the
    /// topic's minimum.
    pub fn validate_submission(&mut self) -> Result<usize> {
        if self.essay.trim().is_empty() {
            return Err(ExerciseError::EmptyEssay);
        }
        let actual = self.word_count();
        let required = self.topic.word_limit;
        if actual < required as usize {
            return Err(ExerciseError::BelowWordLimit { required, actual });
        }
        self.countdown.pause();
        Ok(actual)
    }

    /// Stores the examiner's evaluation.
    pub fn record_evaluation(&mut self, evaluation: WritingEvaluation) {
        self.countdown.pause();
        self.evaluation = Some(evaluation);
    }

    /// The evaluation, once received.
    #[must_use]
    pub const fn evaluation(&self) -> Option<&WritingEvaluation> {
        self.evaluation.as_ref()
    }
}
