use std::fmt::Write as _;

use quiz_core::model::{AnswerResult, SessionSummary};

/// Human-readable summary: player, total, question count and one block per question.
#[must_use]
pub fn render_summary_document(summary: &SessionSummary) -> String {
    let mut out = String::new();
    // Writing into a `String` cannot fail.
    let _ = writeln!(out, "Quiz Results - {}", summary.player_name());
    out.push('\n');
    let _ = writeln!(out, "Total Score: {}", summary.total_score());
    let _ = writeln!(out, "Questions: {}", summary.question_count());

    for (i, result) in summary.results().iter().enumerate() {
        out.push('\n');
        let _ = writeln!(out, "Q{}: {}", i + 1, result.question);
        let _ = writeln!(out, "{}", result_line(result));
    }
    out
}

fn result_line(result: &AnswerResult) -> String {
    format!(
        "Selected: {}  |  Correct: {}  |  Difficulty: {}  |  Time: {:.2}s  |  Points: {}",
        result.selected_label(),
        result.correct_answer,
        result.difficulty,
        result.elapsed_seconds,
        result.points,
    )
}

/// Ordered per-question results as pretty JSON, for detailed export.
///
/// Elapsed times are rounded to hundredths; scoring already used full precision.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn detailed_results_json(summary: &SessionSummary) -> serde_json::Result<String> {
    let rows: Vec<AnswerResult> = summary
        .results()
        .iter()
        .map(|result| AnswerResult {
            elapsed_seconds: (result.elapsed_seconds * 100.0).round() / 100.0,
            ..result.clone()
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOutcome, Difficulty, PlayerName};
    use quiz_core::time::fixed_now;

    fn summary() -> SessionSummary {
        SessionSummary::from_results(
            PlayerName::new("Ada").unwrap(),
            vec![
                AnswerResult {
                    question: "What does 'BP' commonly stand for?".into(),
                    selected: Some("Blood Pressure".into()),
                    correct_answer: "Blood Pressure".into(),
                    difficulty: Difficulty::Easy,
                    elapsed_seconds: 2.0,
                    points: 88,
                    outcome: AnswerOutcome::Correct,
                },
                AnswerResult {
                    question: "Higher 'oldpeak' values indicate:".into(),
                    selected: None,
                    correct_answer: "More ischemia".into(),
                    difficulty: Difficulty::Hard,
                    elapsed_seconds: 3.456,
                    points: 0,
                    outcome: AnswerOutcome::Skipped,
                },
            ],
            fixed_now(),
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn document_lists_every_question() {
        let doc = render_summary_document(&summary());
        assert!(doc.starts_with("Quiz Results - Ada\n"));
        assert!(doc.contains("Total Score: 88\n"));
        assert!(doc.contains("Questions: 2\n"));
        assert!(doc.contains("Q1: What does 'BP' commonly stand for?"));
        assert!(doc.contains(
            "Selected: Blood Pressure  |  Correct: Blood Pressure  |  Difficulty: Easy  |  Time: 2.00s  |  Points: 88"
        ));
        assert!(doc.contains("Selected: SKIPPED  |  Correct: More ischemia  |  Difficulty: Hard  |  Time: 3.46s  |  Points: 0"));
    }

    #[test]
    fn json_export_keeps_order_and_markers() {
        let json = detailed_results_json(&summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["points"], 88);
        assert!(rows[1]["selected"].is_null());
        assert_eq!(rows[1]["outcome"], "skipped");
        assert_eq!(rows[1]["difficulty"], "Hard");
        assert_eq!(rows[1]["elapsed_seconds"], 3.46);
    }
}
