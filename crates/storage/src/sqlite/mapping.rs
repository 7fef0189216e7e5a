use quiz_core::model::{AnswerOutcome, AnswerResult, Difficulty, PlayerName};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn player_name(raw: &str) -> Result<PlayerName, StorageError> {
    PlayerName::new(raw).map_err(ser)
}

pub(crate) fn outcome_to_str(outcome: AnswerOutcome) -> &'static str {
    outcome.as_str()
}

pub(crate) fn parse_outcome(s: &str) -> Result<AnswerOutcome, StorageError> {
    match s {
        "correct" => Ok(AnswerOutcome::Correct),
        "incorrect" => Ok(AnswerOutcome::Incorrect),
        "timed_out" => Ok(AnswerOutcome::TimedOut),
        "skipped" => Ok(AnswerOutcome::Skipped),
        _ => Err(StorageError::Serialization(format!("invalid outcome: {s}"))),
    }
}

pub(crate) fn parse_difficulty(s: &str) -> Result<Difficulty, StorageError> {
    s.parse::<Difficulty>().map_err(ser)
}

pub(crate) fn map_answer_row(row: &sqlx::sqlite::SqliteRow) -> Result<AnswerResult, StorageError> {
    let elapsed_seconds: f64 = row.try_get("elapsed_seconds").map_err(ser)?;
    if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
        return Err(StorageError::Serialization(format!(
            "invalid elapsed_seconds: {elapsed_seconds}"
        )));
    }

    Ok(AnswerResult {
        question: row.try_get("question").map_err(ser)?,
        selected: row.try_get("selected").map_err(ser)?,
        correct_answer: row.try_get("correct_answer").map_err(ser)?,
        difficulty: parse_difficulty(&row.try_get::<String, _>("difficulty").map_err(ser)?)?,
        elapsed_seconds,
        points: u32_from_i64("points", row.try_get::<i64, _>("points").map_err(ser)?)?,
        outcome: parse_outcome(&row.try_get::<String, _>("outcome").map_err(ser)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_strings_round_trip() {
        for outcome in [
            AnswerOutcome::Correct,
            AnswerOutcome::Incorrect,
            AnswerOutcome::TimedOut,
            AnswerOutcome::Skipped,
        ] {
            assert_eq!(parse_outcome(outcome_to_str(outcome)).unwrap(), outcome);
        }
        assert!(parse_outcome("late").is_err());
    }

    #[test]
    fn rejects_negative_counts() {
        assert!(u32_from_i64("points", -1).is_err());
        assert_eq!(u32_from_i64("points", 42).unwrap(), 42);
    }
}
