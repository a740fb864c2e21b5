//! Listening exercise: a spoken transcript followed by questions.

use std::fmt;

use crate::model::ListeningContent;
use crate::quiz::{Advance, QuizSession};
use crate::{ExerciseError, Result};

/// Speech rate used when reading the transcript aloud.
pub const SPEECH_RATE: f32 = 0.9;

/// Transcript playback state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Playback {
    /// Not started yet; questions stay hidden.
    #[default]
    NotPlayed,
    /// Being spoken.
    Playing,
    /// Played at least once and now silent.
    Played,
}

impl fmt::Display for Playback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPlayed => f.write_str("audio not played"),
            Self::Playing => f.write_str("playing"),
            Self::Played => f.write_str("played"),
        }
    }
}

/// State of a listening exercise.
#[derive(Debug, Clone)]
pub struct ListeningSession {
    transcript: String,
    quiz: QuizSession,
    playback: Playback,
}

impl ListeningSession {
    /// Opens the exercise with nothing played.
    ///
    /// # Errors
    ///
    /// `EmptyExercise` if the content has no questions.
    pub fn new(content: ListeningContent) -> Result<Self> {
        let quiz = QuizSession::new(content.questions)?;
        Ok(Self {
            transcript: content.transcript,
            quiz,
            playback: Playback::NotPlayed,
        })
    }

    /// Text to be spoken.
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Playback state.
    #[must_use]
    pub const fn playback(&self) -> Playback {
        self.playback
    }

    /// Questions unlock once playback has started.
    #[must_use]
    pub fn questions_unlocked(&self) -> bool {
        self.playback != Playback::NotPlayed
    }

    /// Starts (or replays) the transcript.
    pub fn play(&mut self) -> Result<()> {
        if self.playback == Playback::Playing {
            return Err(ExerciseError::invalid_transition("play", self.playback));
        }
        self.playback = Playback::Playing;
        Ok(())
    }

    /// Stops playback, whether it ended or was cancelled.
    pub fn stop(&mut self) {
        if self.playback == Playback::Playing {
            self.playback = Playback::Played;
        }
    }

    /// The underlying quiz, read-only.
    #[must_use]
    pub const fn quiz(&self) -> &QuizSession {
        &self.quiz
    }

    /// Answers the current question.
    pub fn select_answer(&mut self, option: &str) -> Result<()> {
        self.ensure_unlocked("answer")?;
        self.quiz.select_answer(option)
    }

    /// Moves to the next question; completing the quiz stops playback.
    pub fn next(&mut self) -> Result<Advance> {
        self.ensure_unlocked("advance")?;
        let advance = self.quiz.next()?;
        if advance == Advance::Finished {
            self.stop();
        }
        Ok(advance)
    }

    /// Moves to the previous question.
    pub fn previous(&mut self) -> Result<usize> {
        self.ensure_unlocked("go back")?;
        self.quiz.previous()
    }

    /// Ends the exercise early, stopping playback.
    pub fn finish(&mut self) {
        self.stop();
        self.quiz.finish();
    }

    fn ensure_unlocked(&self, action: &'static str) -> Result<()> {
        if self.questions_unlocked() {
            Ok(())
        } else {
            Err(ExerciseError::invalid_transition(action, self.playback))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn content() -> ListeningContent {
        ListeningContent {
            transcript: "Good morning, I'd like to book a room.".to_string(),
            questions: vec![
                Question::new("What is booked?", vec!["room".into(), "car".into()], "room"),
                Question::new("When?", vec!["morning".into(), "night".into()], "morning"),
            ],
        }
    }

    #[test]
    fn test_questions_locked_until_played() {
        let mut s = ListeningSession::new(content()).unwrap();
        assert!(!s.questions_unlocked());
        assert_eq!(
            s.select_answer("room").unwrap_err().to_string(),
            "Invalid state transition: cannot answer while audio not played"
        );
        s.play().unwrap();
        assert!(s.questions_unlocked());
        s.select_answer("room").unwrap();
    }

    #[test]
    fn test_cannot_play_twice_at_once() {
        let mut s = ListeningSession::new(content()).unwrap();
        s.play().unwrap();
        assert!(s.play().is_err());
        s.stop();
        assert_eq!(s.playback(), Playback::Played);
        s.play().unwrap();
    }

    #[test]
    fn test_finishing_stops_playback() {
        let mut s = ListeningSession::new(content()).unwrap();
        s.play().unwrap();
        s.select_answer("room").unwrap();
        assert_eq!(s.next().unwrap(), Advance::Moved(1));
        assert_eq!(s.playback(), Playback::Playing);
        s.select_answer("morning").unwrap();
        assert_eq!(s.next().unwrap(), Advance::Finished);
        assert_eq!(s.playback(), Playback::Played);
        assert_eq!(s.quiz().summary().percentage, 100);
    }

    #[test]
    fn test_finish_early_completes_quiz() {
        let mut s = ListeningSession::new(content()).unwrap();
        s.play().unwrap();
        s.select_answer("room").unwrap();
        s.finish();
        assert_eq!(s.playback(), Playback::Played);
        assert!(s.quiz().is_completed());
        assert_eq!(s.quiz().summary().correct, 1);
    }

    #[test]
    fn test_content_without_questions_is_rejected() {
        let err = ListeningSession::new(ListeningContent {
            transcript: "text".to_string(),
            questions: Vec::new(),
        })
        .unwrap_err();
        assert_eq!(err, ExerciseError::EmptyExercise { what: "questions" });
    }
}
