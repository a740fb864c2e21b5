//! Percentage to IELTS band mapping.
//!
//! Locally scored exercises (practice, listening, mock tests) report a band
//! through a fixed threshold table rather than a calibrated conversion.

use serde::{Deserialize, Serialize};

/// `(minimum percentage, band)` pairs, checked from the top.
pub const BAND_THRESHOLDS: [(f64, f64); 4] = [(90.0, 8.5), (80.0, 7.5), (70.0, 6.5), (60.0, 5.5)];

/// Band reported below the lowest threshold.
pub const FLOOR_BAND: f64 = 4.5;

/// Highest band on the IELTS scale.
pub const MAX_BAND: f64 = 9.0;

/// Maps a score percentage to a band.
///
/// # Examples
///
/// ```
/// use eduint_exercise::band_for_percentage;
///
/// assert_eq!(band_for_percentage(100.0), 8.5);
/// assert_eq!(band_for_percentage(89.9), 7.5);
/// assert_eq!(band_for_percentage(60.0), 5.5);
/// assert_eq!(band_for_percentage(12.0), 4.5);
/// ```
#[must_use]
pub fn band_for_percentage(percentage: f64) -> f64 {
    BAND_THRESHOLDS
        .iter()
        .find(|(min, _)| percentage >= *min)
        .map_or(FLOOR_BAND, |(_, band)| *band)
}

/// Returns `true` if `band` lies on the 0–9 scale in half-band steps.
#[must_use]
pub fn is_valid_band(band: f64) -> bool {
    (0.0..=MAX_BAND).contains(&band) && (band * 2.0).fract() == 0.0
}

/// Outcome of a locally scored exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Questions answered correctly.
    pub correct: usize,
    /// Questions in the exercise.
    pub total: usize,
    /// Rounded percentage shown to the learner.
    pub percentage: u32,
    /// Band derived from the unrounded percentage.
    pub band: f64,
}

impl ScoreSummary {
    /// Builds a summary from raw counts.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn from_counts(correct: usize, total: usize) -> Self {
        let exact = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64 * 100.0
        };
        Self {
            correct,
            total,
            percentage: exact.round() as u32,
            band: band_for_percentage(exact),
        }
    }

    /// Returns `true` when every question was answered correctly.
    #[must_use]
    pub const fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}
