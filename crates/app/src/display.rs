use std::fmt::Write as _;

use quiz_core::QuestionBank;
use quiz_core::model::{Difficulty, RankedEntry};
use quiz_core::scoring::ScoringTable;
use services::SessionSummaryListItem;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[must_use]
pub fn render_leaderboard(entries: &[RankedEntry]) -> String {
    if entries.is_empty() {
        return "No scores recorded yet.\n".to_owned();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<40}  {:>6}  {}", "Rank", "Player", "Score", "Date");
    for ranked in entries {
        let _ = writeln!(
            out,
            "{:>4}  {:<40}  {:>6}  {}",
            ranked.rank,
            ranked.entry.player_name,
            ranked.entry.score,
            ranked.entry.recorded_at.format(TIMESTAMP_FORMAT),
        );
    }
    out
}

#[must_use]
pub fn render_history(items: &[SessionSummaryListItem]) -> String {
    if items.is_empty() {
        return "No finished sessions yet.\n".to_owned();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "#{} {}  {} pts over {} questions  ({})",
            item.id,
            item.player_name,
            item.total_score,
            item.question_count,
            item.completed_at.format(TIMESTAMP_FORMAT),
        );
    }
    out
}

/// Bank contents grouped by tier, with each tier's points and countdown.
#[must_use]
pub fn render_bank(bank: &QuestionBank, scoring: &ScoringTable) -> String {
    let mut out = String::new();
    for difficulty in Difficulty::ALL {
        let profile = scoring.profile(difficulty);
        let questions = bank.filter_by_difficulty(difficulty);
        let _ = writeln!(
            out,
            "{difficulty} ({} questions, {} pts, {}s)",
            questions.len(),
            profile.base_points(),
            profile.time_limit_secs(),
        );
        for question in questions {
            let _ = writeln!(out, "  - {}", question.text());
            let _ = writeln!(out, "    answer: {}", question.correct_answer());
        }
    }
    out
}
