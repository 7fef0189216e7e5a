use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::difficulty::Difficulty;

/// How a single question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// Submitted at or after the time limit. Scored zero whatever the choice.
    TimedOut,
    Skipped,
}

impl AnswerOutcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerOutcome::Correct => "correct",
            AnswerOutcome::Incorrect => "incorrect",
            AnswerOutcome::TimedOut => "timed_out",
            AnswerOutcome::Skipped => "skipped",
        }
    }
}

impl fmt::Display for AnswerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one resolved question. Immutable once appended to a session.
///
/// `selected` is `None` only for skipped questions; a late submission keeps
/// the picked choice and is flagged through `outcome`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub question: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub difficulty: Difficulty,
    pub elapsed_seconds: f64,
    pub points: u32,
    pub outcome: AnswerOutcome,
}

impl AnswerResult {
    /// Label for the selection column of exports.
    #[must_use]
    pub fn selected_label(&self) -> &str {
        self.selected.as_deref().unwrap_or("SKIPPED")
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.outcome == AnswerOutcome::Skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_results_render_marker() {
        let result = AnswerResult {
            question: "Q".into(),
            selected: None,
            correct_answer: "A".into(),
            difficulty: Difficulty::Easy,
            elapsed_seconds: 1.0,
            points: 0,
            outcome: AnswerOutcome::Skipped,
        };
        assert_eq!(result.selected_label(), "SKIPPED");
        assert!(result.is_skipped());
    }

    #[test]
    fn outcome_serializes_snake_case() {
        let json = serde_json::to_string(&AnswerOutcome::TimedOut).unwrap();
        assert_eq!(json, "\"timed_out\"");
    }
}
