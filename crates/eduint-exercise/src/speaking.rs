//! Recorded speaking response.
//!
//! The recorder and speech recognizer are external; this session keeps the
//! recorder state and the transcript built from final recognition results.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::model::{SpeakingEvaluation, SpeakingPart, SpeakingTopic};
use crate::{ExerciseError, Result};

/// Microphone recorder state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecorderState {
    /// Nothing recorded yet.
    #[default]
    Idle,
    /// Capturing audio and recognition results.
    Recording,
    /// A recording is available for playback and evaluation.
    Stopped,
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Recording => f.write_str("recording"),
            Self::Stopped => f.write_str("stopped"),
        }
    }
}

/// A speaking exercise for one generated topic.
#[derive(Debug, Clone)]
pub struct SpeakingSession {
    topic: SpeakingTopic,
    state: RecorderState,
    transcript: String,
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    evaluation: Option<SpeakingEvaluation>,
}

impl SpeakingSession {
    /// Opens a session with an idle recorder.
    #[must_use]
    pub fn new(topic: SpeakingTopic) -> Self {
        Self {
            topic,
            state: RecorderState::Idle,
            transcript: String::new(),
            started_at: None,
            stopped_at: None,
            evaluation: None,
        }
    }

    /// Part of the test being practised.
    #[must_use]
    pub const fn part(&self) -> SpeakingPart {
        self.topic.part
    }

    /// The topic being answered.
    #[must_use]
    pub const fn topic(&self) -> &SpeakingTopic {
        &self.topic
    }

    /// Recorder state.
    #[must_use]
    pub const fn state(&self) -> RecorderState {
        self.state
    }

    /// Transcript so far.
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Replaces the topic, discarding any recording and evaluation.
    pub fn switch_topic(&mut self, topic: SpeakingTopic) {
        *self = Self::new(topic);
    }

    /// Starts a new recording, clearing the previous transcript.
    pub fn start_recording(&mut self) -> Result<()> {
        if self.state == RecorderState::Recording {
            return Err(ExerciseError::invalid_transition("start recording", self.state));
        }
        self.state = RecorderState::Recording;
        self.transcript.clear();
        self.started_at = Some(Utc::now());
        self.stopped_at = None;
        self.evaluation = None;
        Ok(())
    }

    /// Stops the current recording.
    pub fn stop_recording(&mut self) -> Result<()> {
        if self.state != RecorderState::Recording {
            return Err(ExerciseError::invalid_transition("stop recording", self.state));
        }
        self.state = RecorderState::Stopped;
        self.stopped_at = Some(Utc::now());
        Ok(())
    }

    /// Feeds one recognition result.
    ///
    /// Interim results and results arriving outside a recording are ignored.
    /// Returns `true` if the segment was appended.
    pub fn push_recognition(&mut self, segment: &str, is_final: bool) -> bool {
        if !is_final || self.state != RecorderState::Recording {
            return false;
        }
        self.transcript.push_str(segment);
        self.transcript.push(' ');
        true
    }

    /// Length of the last recording in whole seconds.
    #[must_use]
    pub fn recorded_seconds(&self) -> Option<i64> {
        match (self.started_at, self.stopped_at) {
            (Some(start), Some(stop)) => Some((stop - start).num_seconds()),
            _ => None,
        }
    }

    /// Returns the trimmed transcript if there is something to evaluate.
    ///
    /// # Errors
    ///
    /// `EmptyTranscript` when nothing was recognised.
    pub fn validate_submission(&self) -> Result<&str> {
        let transcript = self.transcript.trim();
        if transcript.is_empty() {
            return Err(ExerciseError::EmptyTranscript);
        }
        Ok(transcript)
    }

    /// Stores the examiner's evaluation.
    pub fn record_evaluation(&mut self, evaluation: SpeakingEvaluation) {
        self.evaluation = Some(evaluation);
    }

    /// The evaluation, once received.
    #[must_use]
    pub const fn evaluation(&self) -> Option<&SpeakingEvaluation> {
        self.evaluation.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn topic(part: SpeakingPart) -> SpeakingTopic {
        SpeakingTopic {
            part,
            topic: "Hometown".to_string(),
            questions: vec!["Where are you from?".to_string()],
            prompts: Vec::new(),
            time_limit: 5,
            preparation_time: None,
            instructions: "Answer naturally.".to_string(),
        }
    }

    #[test]
    fn test_only_final_segments_are_appended() {
        let mut s = SpeakingSession::new(topic(SpeakingPart::Part1));
        s.start_recording().unwrap();
        assert!(!s.push_recognition("I come fr", false));
        assert!(s.push_recognition("I come from Lyon", true));
        assert!(s.push_recognition("it is a big city", true));
        assert_eq!(s.transcript(), "I come from Lyon it is a big city ");
    }

    #[test]
    fn test_segments_outside_recording_are_ignored() {
        let mut s = SpeakingSession::new(topic(SpeakingPart::Part1));
        assert!(!s.push_recognition("hello", true));
        s.start_recording().unwrap();
        s.stop_recording().unwrap();
        assert!(!s.push_recognition("late result", true));
        assert_eq!(s.transcript(), "");
    }

    #[test]
    fn test_new_recording_clears_transcript() {
        let mut s = SpeakingSession::new(topic(SpeakingPart::Part1));
        s.start_recording().unwrap();
        s.push_recognition("first take", true);
        s.stop_recording().unwrap();
        assert_eq!(s.state(), RecorderState::Stopped);
        assert!(s.recorded_seconds().is_some());

        s.start_recording().unwrap();
        assert_eq!(s.transcript(), "");
        assert_eq!(s.recorded_seconds(), None);
    }

    #[test]
    fn test_invalid_recorder_transitions() {
        let mut s = SpeakingSession::new(topic(SpeakingPart::Part2));
        assert_eq!(
            s.stop_recording().unwrap_err().to_string(),
            "Invalid state transition: cannot stop recording while idle"
        );
        s.start_recording().unwrap();
        assert!(s.start_recording().is_err());
    }

    #[test]
    fn test_blank_transcript_is_rejected() {
        let mut s = SpeakingSession::new(topic(SpeakingPart::Part1));
        assert_eq!(
            s.validate_submission().unwrap_err(),
            ExerciseError::EmptyTranscript
        );
        s.start_recording().unwrap();
        s.push_recognition("  ", true);
        assert!(s.validate_submission().is_err());
        s.push_recognition("Hello there", true);
        assert_eq!(s.validate_submission().unwrap(), "Hello there");
    }

    #[test]
    fn test_switching_part_resets_session() {
        let mut s = SpeakingSession::new(topic(SpeakingPart::Part1));
        s.start_recording().unwrap();
        s.push_recognition("something", true);
        s.switch_topic(topic(SpeakingPart::Part3));
        assert_eq!(s.part(), SpeakingPart::Part3);
        assert_eq!(s.state(), RecorderState::Idle);
        assert_eq!(s.transcript(), "");
        assert!(s.evaluation().is_none());
    }
}
