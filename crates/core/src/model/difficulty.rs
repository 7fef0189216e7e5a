use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseDifficultyError {
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier of a question.
///
/// Each tier carries its own base points and countdown in the scoring table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All tiers, from easiest to hardest.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseDifficultyError::UnknownDifficulty(s.to_owned())),
        }
    }
}

//
// ─── FILTER ────────────────────────────────────────────────────────────────────
//

/// Which questions are eligible when building a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DifficultyFilter {
    /// Every question in the bank.
    #[default]
    Mixed,
    /// Only questions of exactly this tier.
    Only(Difficulty),
}

impl DifficultyFilter {
    #[must_use]
    pub fn matches(self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::Mixed => true,
            DifficultyFilter::Only(tier) => tier == difficulty,
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyFilter::Mixed => f.write_str("Mixed"),
            DifficultyFilter::Only(tier) => tier.fmt(f),
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("mixed") {
            return Ok(Self::Mixed);
        }
        s.parse::<Difficulty>().map(Self::Only)
    }
}

impl From<Difficulty> for DifficultyFilter {
    fn from(value: Difficulty) -> Self {
        Self::Only(value)
    }
}
