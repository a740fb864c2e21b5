//! Sequential multiple-choice session.
//!
//! A [`QuizSession`] walks a fixed list of questions with a current index,
//! one recorded answer per question, and a terminal `Completed` state. It
//! backs the practice, listening and mock-test exercises.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::band::ScoreSummary;
use crate::model::Question;
use crate::{ExerciseError, Result};

// ============================================================================
// QuizStatus
// ============================================================================

/// Lifecycle of a quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizStatus {
    /// Questions are being answered.
    #[default]
    InProgress,
    /// The last question was submitted or the timer ran out.
    Completed,
}

impl fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => f.write_str("in progress"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

/// Result of [`QuizSession::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at this index.
    Moved(usize),
    /// The last question was submitted; the quiz is complete.
    Finished,
}

/// Given vs expected answer for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    /// 1-based question number.
    pub number: usize,
    /// The question text.
    pub question: String,
    /// The learner's answer, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    /// The correct answer.
    pub correct: String,
    /// Whether `given` matched `correct`.
    pub is_correct: bool,
}

// ============================================================================
// QuizSession
// ============================================================================

/// State of a multiple-choice exercise.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    answers: Vec<Option<String>>,
    status: QuizStatus,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Starts a quiz at the first question.
    ///
    /// # Errors
    ///
    /// Returns `EmptyExercise` if `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(ExerciseError::EmptyExercise { what: "questions" });
        }
        let answers = vec![None; questions.len()];
        Ok(Self {
            questions,
            current: 0,
            answers,
            status: QuizStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
        })
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`; construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> QuizStatus {
        self.status
    }

    /// Returns `true` once the quiz has completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == QuizStatus::Completed
    }

    /// 0-based index of the current question.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// The question currently shown.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// All questions in order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Answer recorded for the current question.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.answers[self.current].as_deref()
    }

    /// Records `option` as the answer to the current question.
    ///
    /// Choosing again replaces the previous answer.
    pub fn select_answer(&mut self, option: &str) -> Result<()> {
        self.ensure_in_progress("answer")?;
        let question = &self.questions[self.current];
        if !question.options.iter().any(|o| o == option) {
            return Err(ExerciseError::UnknownOption {
                option: option.to_string(),
            });
        }
        self.answers[self.current] = Some(option.to_string());
        Ok(())
    }

    /// Submits the current answer and moves forward.
    ///
    /// On the last question this completes the quiz.
    ///
    /// # Errors
    ///
    /// `NoAnswerSelected` if the current question is unanswered.
    pub fn next(&mut self) -> Result<Advance> {
        self.ensure_in_progress("advance")?;
        if self.answers[self.current].is_none() {
            return Err(ExerciseError::NoAnswerSelected);
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Ok(Advance::Moved(self.current))
        } else {
            self.complete();
            Ok(Advance::Finished)
        }
    }

    /// Moves back one question; stays put on the first.
    pub fn previous(&mut self) -> Result<usize> {
        self.ensure_in_progress("go back")?;
        self.current = self.current.saturating_sub(1);
        Ok(self.current)
    }

    /// Completes the quiz regardless of unanswered questions.
    ///
    /// Used when a countdown expires. Calling it twice is harmless.
    pub fn finish(&mut self) {
        if !self.is_completed() {
            self.complete();
        }
    }

    /// Position through the quiz, counting the current question.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        (self.current + 1) as f64 / self.questions.len() as f64 * 100.0
    }

    /// Number of questions with a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Correct count, percentage and band so far.
    #[must_use]
    pub fn summary(&self) -> ScoreSummary {
        let correct = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| a.as_deref().is_some_and(|a| q.is_correct(a)))
            .count();
        ScoreSummary::from_counts(correct, self.questions.len())
    }

    /// Per-question comparison of given and correct answers.
    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem> {
        self.questions
            .iter()
            .zip(&self.answers)
            .enumerate()
            .map(|(i, (q, given))| ReviewItem {
                number: i + 1,
                question: q.question.clone(),
                given: given.clone(),
                correct: q.correct.clone(),
                is_correct: given.as_deref().is_some_and(|g| q.is_correct(g)),
            })
            .collect()
    }

    /// When the quiz started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the quiz completed, if it has.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    fn complete(&mut self) {
        self.status = QuizStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    fn ensure_in_progress(&self, action: &'static str) -> Result<()> {
        if self.is_completed() {
            return Err(ExerciseError::invalid_transition(action, self.status));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn question(n: usize) -> Question {
        Question::new(
            format!("Question {n}"),
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            "B",
        )
    }

    fn quiz(n: usize) -> QuizSession {
        QuizSession::new((1..=n).map(question).collect()).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_list() {
        let err = QuizSession::new(Vec::new()).unwrap_err();
        assert_eq!(err, ExerciseError::EmptyExercise { what: "questions" });
    }

    #[test]
    fn test_next_requires_an_answer() {
        let mut q = quiz(3);
        assert_eq!(q.next().unwrap_err(), ExerciseError::NoAnswerSelected);
        assert_eq!(q.current_index(), 0);
    }

    #[test]
    fn test_select_rejects_unknown_option() {
        let mut q = quiz(1);
        let err = q.select_answer("E").unwrap_err();
        assert_eq!(
            err,
            ExerciseError::UnknownOption {
                option: "E".to_string()
            }
        );
        assert_eq!(q.selected(), None);
    }

    #[test]
    fn test_walks_forward_and_back() {
        let mut q = quiz(3);
        q.select_answer("A").unwrap();
        assert_eq!(q.next().unwrap(), Advance::Moved(1));
        assert_eq!(q.selected(), None);

        assert_eq!(q.previous().unwrap(), 0);
        assert_eq!(q.selected(), Some("A"));
        assert_eq!(q.previous().unwrap(), 0);

        q.select_answer("B").unwrap();
        assert_eq!(q.selected(), Some("B"));
    }

    #[test]
    fn test_all_correct_yields_one_hundred_percent() {
        for n in 1..=15 {
            let mut q = quiz(n);
            loop {
                q.select_answer("B").unwrap();
                if q.next().unwrap() == Advance::Finished {
                    break;
                }
            }
            assert!(q.is_completed());
            let summary = q.summary();
            assert_eq!(summary.correct, n);
            assert_eq!(summary.percentage, 100);
            assert_eq!(summary.band, 8.5);
        }
    }

    #[test]
    fn test_mixed_answers_summary_and_review() {
        let mut q = quiz(4);
        for answer in ["B", "A", "B", "C"] {
            q.select_answer(answer).unwrap();
            q.next().unwrap();
        }
        let summary = q.summary();
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.percentage, 50);
        assert_eq!(summary.band, 4.5);

        let review = q.review();
        assert_eq!(review.len(), 4);
        assert_eq!(review[1].number, 2);
        assert_eq!(review[1].given.as_deref(), Some("A"));
        assert!(!review[1].is_correct);
        assert!(review[2].is_correct);
    }

    #[test]
    fn test_completed_quiz_rejects_changes() {
        let mut q = quiz(1);
        q.select_answer("B").unwrap();
        assert_eq!(q.next().unwrap(), Advance::Finished);

        let err = q.select_answer("A").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid state transition: cannot answer while completed"
        );
        assert!(q.next().is_err());
        assert!(q.previous().is_err());
    }

    #[test]
    fn test_finish_with_unanswered_questions() {
        let mut q = quiz(5);
        q.select_answer("B").unwrap();
        q.next().unwrap();
        q.finish();
        q.finish();

        assert_eq!(q.status(), QuizStatus::Completed);
        assert!(q.completed_at().is_some());
        assert_eq!(q.answered_count(), 1);
        assert_eq!(q.summary().percentage, 20);
        assert_eq!(q.review()[4].given, None);
    }

    #[test]
    fn test_progress_percent() {
        let mut q = quiz(4);
        assert_eq!(q.progress_percent(), 25.0);
        q.select_answer("A").unwrap();
        q.next().unwrap();
        assert_eq!(q.progress_percent(), 50.0);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&QuizStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
        assert_eq!(QuizStatus::default(), QuizStatus::InProgress);
    }
}
