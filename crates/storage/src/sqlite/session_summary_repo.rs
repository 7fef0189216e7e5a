use quiz_core::model::SessionSummary;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{map_answer_row, outcome_to_str, player_name, ser, u32_from_i64};
use crate::repository::{SessionSummaryRepository, SessionSummaryRow, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl SqliteRepository {
    async fn load_summary(
        &self,
        row: &sqlx::sqlite::SqliteRow,
    ) -> Result<SessionSummaryRow, StorageError> {
        let id: i64 = row.try_get("id").map_err(ser)?;

        let result_rows = sqlx::query(
            r"
                SELECT
                    question, selected, correct_answer, difficulty,
                    elapsed_seconds, points, outcome
                FROM answer_results
                WHERE summary_id = ?1
                ORDER BY position ASC
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let results = result_rows
            .iter()
            .map(map_answer_row)
            .collect::<Result<Vec<_>, _>>()?;

        let summary = SessionSummary::from_persisted(
            player_name(&row.try_get::<String, _>("player_name").map_err(ser)?)?,
            u32_from_i64(
                "total_score",
                row.try_get::<i64, _>("total_score").map_err(ser)?,
            )?,
            u32_from_i64(
                "question_count",
                row.try_get::<i64, _>("question_count").map_err(ser)?,
            )?,
            results,
            row.try_get("started_at").map_err(ser)?,
            row.try_get("completed_at").map_err(ser)?,
        )
        .map_err(ser)?;

        Ok(SessionSummaryRow::new(id, summary))
    }
}

#[async_trait::async_trait]
impl SessionSummaryRepository for SqliteRepository {
    async fn append_summary(&self, summary: &SessionSummary) -> Result<i64, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let res = sqlx::query(
            r"
                INSERT INTO session_summaries (
                    player_name, total_score, question_count, started_at, completed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(summary.player_name().as_str())
        .bind(i64::from(summary.total_score()))
        .bind(i64::from(summary.question_count()))
        .bind(summary.started_at())
        .bind(summary.completed_at())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;
        let summary_id = res.last_insert_rowid();

        for (position, result) in summary.results().iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StorageError::Serialization("position overflow".into()))?;
            sqlx::query(
                r"
                    INSERT INTO answer_results (
                        summary_id, position, question, selected, correct_answer,
                        difficulty, elapsed_seconds, points, outcome
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ",
            )
            .bind(summary_id)
            .bind(position)
            .bind(&result.question)
            .bind(result.selected.as_deref())
            .bind(&result.correct_answer)
            .bind(result.difficulty.as_str())
            .bind(result.elapsed_seconds)
            .bind(i64::from(result.points))
            .bind(outcome_to_str(result.outcome))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(summary_id)
    }

    async fn get_summary(&self, id: i64) -> Result<SessionSummary, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    id, player_name, total_score, question_count, started_at, completed_at
                FROM session_summaries
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        Ok(self.load_summary(&row).await?.summary)
    }

    async fn list_summary_rows(&self, limit: u32) -> Result<Vec<SessionSummaryRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, player_name, total_score, question_count, started_at, completed_at
                FROM session_summaries
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(self.load_summary(row).await?);
        }
        Ok(out)
    }
}
