use quiz_core::model::LeaderboardEntry;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{ser, u32_from_i64};
use crate::repository::{LeaderboardRepository, StorageError};

#[async_trait::async_trait]
impl LeaderboardRepository for SqliteRepository {
    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO leaderboard_entries (player_name, score, recorded_at)
                VALUES (?1, ?2, ?3)
            ",
        )
        .bind(&entry.player_name)
        .bind(i64::from(entry.score))
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT player_name, score, recorded_at
                FROM leaderboard_entries
                ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter()
            .map(|row| {
                Ok(LeaderboardEntry {
                    player_name: row.try_get("player_name").map_err(ser)?,
                    score: u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?,
                    recorded_at: row.try_get("recorded_at").map_err(ser)?,
                })
            })
            .collect()
    }
}
