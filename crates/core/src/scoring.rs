//! Point calculation for answered questions.
//!
//! A correct answer given before the countdown ends is worth the tier's base
//! points minus a fixed per-second penalty; the penalty is floored only after
//! multiplying, so `2.9s * 6 = 17.4` costs 17 points, not 12 or 18.

use thiserror::Error;

use crate::model::{AnswerOutcome, Difficulty};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("base points must be > 0")]
    InvalidBasePoints,

    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,
}

//
// ─── PROFILE ───────────────────────────────────────────────────────────────────
//

/// Base points and countdown for one difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyProfile {
    base_points: u32,
    time_limit_secs: u32,
}

impl DifficultyProfile {
    /// # Errors
    ///
    /// Returns `ScoringError` if either value is zero.
    pub fn new(base_points: u32, time_limit_secs: u32) -> Result<Self, ScoringError> {
        if base_points == 0 {
            return Err(ScoringError::InvalidBasePoints);
        }
        if time_limit_secs == 0 {
            return Err(ScoringError::InvalidTimeLimit);
        }
        Ok(Self {
            base_points,
            time_limit_secs,
        })
    }

    #[must_use]
    pub fn base_points(&self) -> u32 {
        self.base_points
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    /// Seconds left on the countdown, never negative.
    #[must_use]
    pub fn remaining_seconds(&self, elapsed_secs: f64) -> f64 {
        (f64::from(self.time_limit_secs) - elapsed_secs).max(0.0)
    }

    /// Whole seconds left, truncated, for countdown captions.
    #[must_use]
    pub fn remaining_whole_seconds(&self, elapsed_secs: f64) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let secs = self.remaining_seconds(elapsed_secs).floor() as u32;
        secs
    }

    /// Share of the countdown already used, in `0.0..=1.0`.
    #[must_use]
    pub fn elapsed_fraction(&self, elapsed_secs: f64) -> f64 {
        (elapsed_secs / f64::from(self.time_limit_secs)).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_expired(&self, elapsed_secs: f64) -> bool {
        elapsed_secs >= f64::from(self.time_limit_secs)
    }
}

//
// ─── TABLE ─────────────────────────────────────────────────────────────────────
//

/// Result of scoring one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub outcome: AnswerOutcome,
    pub points: u32,
}

/// Per-tier profiles plus the shared speed penalty.
///
/// Every `Difficulty` has a profile by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringTable {
    easy: DifficultyProfile,
    medium: DifficultyProfile,
    hard: DifficultyProfile,
    penalty_per_second: u32,
}

impl ScoringTable {
    pub const REFERENCE_PENALTY_PER_SECOND: u32 = 6;

    #[must_use]
    pub fn new(
        easy: DifficultyProfile,
        medium: DifficultyProfile,
        hard: DifficultyProfile,
        penalty_per_second: u32,
    ) -> Self {
        Self {
            easy,
            medium,
            hard,
            penalty_per_second,
        }
    }

    /// Easy 100/15s, Medium 150/12s, Hard 200/10s, 6 points per second.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            easy: DifficultyProfile {
                base_points: 100,
                time_limit_secs: 15,
            },
            medium: DifficultyProfile {
                base_points: 150,
                time_limit_secs: 12,
            },
            hard: DifficultyProfile {
                base_points: 200,
                time_limit_secs: 10,
            },
            penalty_per_second: Self::REFERENCE_PENALTY_PER_SECOND,
        }
    }

    #[must_use]
    pub fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Points for a correct answer after `elapsed_secs`, ignoring the time limit.
    ///
    /// `max(0, base - floor(elapsed * penalty))`.
    #[must_use]
    pub fn correct_points(&self, difficulty: Difficulty, elapsed_secs: f64) -> u32 {
        let base = f64::from(self.profile(difficulty).base_points);
        let penalty = (elapsed_secs.max(0.0) * f64::from(self.penalty_per_second)).floor();
        let points = base - penalty;
        if points <= 0.0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let points = points as u32;
        points
    }

    /// Score a submitted choice.
    ///
    /// Late submissions are accepted but always score zero.
    #[must_use]
    pub fn assess(&self, difficulty: Difficulty, correct: bool, elapsed_secs: f64) -> Assessment {
        if self.profile(difficulty).is_expired(elapsed_secs) {
            return Assessment {
                outcome: AnswerOutcome::TimedOut,
                points: 0,
            };
        }
        if correct {
            Assessment {
                outcome: AnswerOutcome::Correct,
                points: self.correct_points(difficulty, elapsed_secs),
            }
        } else {
            Assessment {
                outcome: AnswerOutcome::Incorrect,
                points: 0,
            }
        }
    }
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self::reference()
    }
}
