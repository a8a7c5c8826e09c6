use std::collections::HashMap;

use chrono::{DateTime, Utc};
use otocards_core::model::{CardId, ProgressRecord, ProgressSummary, ProgressUpdate, UserId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{map_progress_row, ser};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn record_seen(
        &self,
        user: UserId,
        card_id: &CardId,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO progress (user_id, card_id, bookmarked, completed, difficulty_rating, times_seen, last_seen_at)
            VALUES (?1, ?2, 0, 0, NULL, 1, ?3)
            ON CONFLICT(user_id, card_id) DO UPDATE SET
                times_seen = times_seen + 1,
                last_seen_at = excluded.last_seen_at
            ",
        )
        .bind(user.to_string())
        .bind(card_id.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn update_fields(
        &self,
        user: UserId,
        card_id: &CardId,
        update: &ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        update.validate().map_err(ser)?;

        // The same bound values serve both arms: the insert path seeds
        // defaults for absent fields, the update path keeps existing values
        // via COALESCE so unrelated fields are never clobbered.
        sqlx::query(
            r"
            INSERT INTO progress (user_id, card_id, bookmarked, completed, difficulty_rating, times_seen, last_seen_at)
            VALUES (?1, ?2, COALESCE(?3, 0), COALESCE(?4, 0), ?5, 1, ?6)
            ON CONFLICT(user_id, card_id) DO UPDATE SET
                bookmarked = COALESCE(?3, bookmarked),
                completed = COALESCE(?4, completed),
                difficulty_rating = COALESCE(?5, difficulty_rating)
            ",
        )
        .bind(user.to_string())
        .bind(card_id.as_str())
        .bind(update.bookmarked)
        .bind(update.completed)
        .bind(update.difficulty_rating.map(i64::from))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn progress_for_user(
        &self,
        user: UserId,
    ) -> Result<HashMap<CardId, ProgressRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT card_id, bookmarked, completed, difficulty_rating, times_seen, last_seen_at
            FROM progress
            WHERE user_id = ?1
            ",
        )
        .bind(user.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut progress = HashMap::with_capacity(rows.len());
        for row in rows {
            let (card_id, record) = map_progress_row(&row)?;
            progress.insert(card_id, record);
        }
        Ok(progress)
    }

    async fn summary_for_user(&self, user: UserId) -> Result<ProgressSummary, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                SUM(CASE WHEN times_seen > 0 THEN 1 ELSE 0 END) AS seen,
                SUM(CASE WHEN bookmarked != 0 THEN 1 ELSE 0 END) AS bookmarked,
                SUM(CASE WHEN completed != 0 THEN 1 ELSE 0 END) AS completed
            FROM progress
            WHERE user_id = ?1
            ",
        )
        .bind(user.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let count = |field: &str| -> Result<u32, StorageError> {
            let raw: Option<i64> = row.try_get(field).map_err(ser)?;
            u32::try_from(raw.unwrap_or(0))
                .map_err(|_| StorageError::Serialization(format!("invalid {field} count")))
        };

        Ok(ProgressSummary {
            seen: count("seen")?,
            bookmarked: count("bookmarked")?,
            completed: count("completed")?,
        })
    }
}
