//! One-second countdowns.
//!
//! The countdown itself is a plain counter; front-ends drive it with a
//! one-second interval and react to [`Tick::Expired`].

/// Seconds allowed for a mock test.
pub const MOCK_TEST_SECONDS: u32 = 15 * 60;

/// Seconds per game round.
pub const GAME_ROUND_SECONDS: u32 = 30;

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still running with this many seconds left.
    Running(u32),
    /// Reached zero on this tick, or was already at zero.
    Expired,
    /// Not running; nothing changed.
    Paused,
}

/// A countdown in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    /// Creates a paused countdown.
    #[must_use]
    pub const fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            running: false,
        }
    }

    /// Creates a countdown that is already running.
    #[must_use]
    pub const fn started(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            running: true,
        }
    }

    /// Seconds left.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns `true` while ticking.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Returns `true` at zero.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Resumes ticking.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops ticking, keeping the remaining time.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Sets a new duration; the running flag is left as is.
    pub fn reset(&mut self, seconds: u32) {
        self.remaining = seconds;
    }

    /// Advances one second.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Paused;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }
}

/// Formats seconds as `m:ss`.
///
/// # Examples
///
/// ```
/// use eduint_exercise::format_clock;
///
/// assert_eq!(format_clock(900), "15:00");
/// assert_eq!(format_clock(65), "1:05");
/// assert_eq!(format_clock(0), "0:00");
/// ```
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
