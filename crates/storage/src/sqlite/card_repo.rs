use otocards_core::model::{Card, Category};

use super::SqliteRepository;
use super::mapping::{map_card_row, ser};
use crate::repository::{CardRepository, StorageError};

#[async_trait::async_trait]
impl CardRepository for SqliteRepository {
    async fn upsert_card(&self, card: &Card) -> Result<(), StorageError> {
        let content = serde_json::to_string(&card.content).map_err(ser)?;

        sqlx::query(
            r"
            INSERT INTO cards (id, stack, category, difficulty, seq, content)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                stack = excluded.stack,
                category = excluded.category,
                difficulty = excluded.difficulty,
                seq = excluded.seq,
                content = excluded.content
            ",
        )
        .bind(card.id.as_str())
        .bind(&card.stack)
        .bind(card.category.as_str())
        .bind(card.difficulty.as_str())
        .bind(i64::from(card.seq))
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn list_cards(
        &self,
        stack: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Card>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, stack, category, difficulty, seq, content
            FROM cards
            WHERE (?1 IS NULL OR stack = ?1)
              AND (?2 IS NULL OR category = ?2)
            ORDER BY seq ASC, id ASC
            ",
        )
        .bind(stack)
        .bind(category.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut cards = Vec::with_capacity(rows.len());
        for row in rows {
            cards.push(map_card_row(&row)?);
        }
        Ok(cards)
    }
}
