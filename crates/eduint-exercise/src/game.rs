//! Timed game rounds.
//!
//! Each round shows one [`GameItem`] with a fresh 30-second countdown.
//! Fast correct answers earn more points; wrong answers cost points but
//! leave the round open. The game ends after the last round or when a
//! round's countdown reaches zero.

use serde::{Deserialize, Serialize};

use crate::model::{GameItem, GameType};
use crate::timer::{Countdown, Tick, GAME_ROUND_SECONDS};
use crate::{ExerciseError, Result};

/// Points for any correct answer.
pub const POINTS_BASE: u32 = 100;

/// Bonus points per second left on the round's countdown.
pub const POINTS_PER_SECOND: u32 = 10;

/// Points lost for a wrong answer.
pub const WRONG_ANSWER_PENALTY: u32 = 50;

/// Result of answering a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// Right answer.
    Correct {
        /// Points earned.
        points: u32,
        /// `true` if this was the last round.
        game_over: bool,
    },
    /// Wrong answer; the round continues.
    Wrong {
        /// Points actually deducted (never more than the score held).
        penalty: u32,
    },
}

/// Final standing of a game, for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// Which game.
    pub game: GameType,
    /// Final score.
    pub score: u32,
    /// Rounds answered correctly.
    pub rounds_won: usize,
    /// Rounds in the game.
    pub rounds: usize,
}

/// State of one game.
#[derive(Debug, Clone)]
pub struct GameSession {
    game: GameType,
    items: Vec<GameItem>,
    current: usize,
    score: u32,
    rounds_won: usize,
    countdown: Countdown,
    over: bool,
}

impl GameSession {
    /// Starts the first round.
    ///
    /// # Errors
    ///
    /// Returns `EmptyExercise` if `items` is empty.
    pub fn new(game: GameType, items: Vec<GameItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(ExerciseError::EmptyExercise {
                what: "game content",
            });
        }
        Ok(Self {
            game,
            items,
            current: 0,
            score: 0,
            rounds_won: 0,
            countdown: Countdown::started(GAME_ROUND_SECONDS),
            over: false,
        })
    }

    /// Which game is being played.
    #[must_use]
    pub const fn game(&self) -> GameType {
        self.game
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// 0-based round index.
    #[must_use]
    pub const fn round(&self) -> usize {
        self.current
    }

    /// Number of rounds.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.items.len()
    }

    /// Seconds left in the current round.
    #[must_use]
    pub const fn time_left(&self) -> u32 {
        self.countdown.remaining()
    }

    /// Returns `true` once the game has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.over
    }

    /// The item for the current round.
    #[must_use]
    pub fn current_item(&self) -> &GameItem {
        &self.items[self.current]
    }

    /// Answers the current round.
    pub fn answer(&mut self, option: &str) -> Result<GameOutcome> {
        if self.over {
            return Err(ExerciseError::invalid_transition("answer", "game over"));
        }
        let item = &self.items[self.current];
        if !item.options.iter().any(|o| o == option) {
            return Err(ExerciseError::UnknownOption {
                option: option.to_string(),
            });
        }

        if item.correct == option {
            let points = POINTS_BASE + self.countdown.remaining() * POINTS_PER_SECOND;
            self.score += points;
            self.rounds_won += 1;
            let game_over = self.current + 1 >= self.items.len();
            if game_over {
                self.end();
            } else {
                self.current += 1;
                self.countdown.reset(GAME_ROUND_SECONDS);
            }
            Ok(GameOutcome::Correct { points, game_over })
        } else {
            let penalty = WRONG_ANSWER_PENALTY.min(self.score);
            self.score -= penalty;
            Ok(GameOutcome::Wrong { penalty })
        }
    }

    /// Advances the round countdown; expiry ends the game.
    pub fn tick(&mut self) -> Tick {
        if self.over {
            return Tick::Paused;
        }
        let tick = self.countdown.tick();
        if tick == Tick::Expired {
            self.end();
        }
        tick
    }

    /// Final standing.
    #[must_use]
    pub fn result(&self) -> GameResult {
        GameResult {
            game: self.game,
            score: self.score,
            rounds_won: self.rounds_won,
            rounds: self.items.len(),
        }
    }

    fn end(&mut self) {
        self.over = true;
        self.countdown.pause();
    }
}
