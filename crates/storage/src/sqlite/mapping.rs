use otocards_core::model::{Card, CardContent, CardId, Category, Difficulty, ProgressRecord};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn map_card_row(row: &SqliteRow) -> Result<Card, StorageError> {
    let category: Category = row
        .try_get::<String, _>("category")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let difficulty: Difficulty = row
        .try_get::<String, _>("difficulty")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;

    let seq_i64: i64 = row.try_get("seq").map_err(ser)?;
    let seq = u32::try_from(seq_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid seq: {seq_i64}")))?;

    let content: CardContent =
        serde_json::from_str(&row.try_get::<String, _>("content").map_err(ser)?).map_err(ser)?;

    Ok(Card {
        id: CardId::new(row.try_get::<String, _>("id").map_err(ser)?),
        stack: row.try_get("stack").map_err(ser)?,
        category,
        difficulty,
        seq,
        content,
    })
}

pub(crate) fn map_progress_row(
    row: &SqliteRow,
) -> Result<(CardId, ProgressRecord), StorageError> {
    let card_id = CardId::new(row.try_get::<String, _>("card_id").map_err(ser)?);

    let times_seen_i64: i64 = row.try_get("times_seen").map_err(ser)?;
    let times_seen = u32::try_from(times_seen_i64).map_err(|_| {
        StorageError::Serialization(format!("invalid times_seen: {times_seen_i64}"))
    })?;

    let difficulty_rating = row
        .try_get::<Option<i64>, _>("difficulty_rating")
        .map_err(ser)?
        .map(|raw| {
            u8::try_from(raw)
                .map_err(|_| StorageError::Serialization(format!("invalid rating: {raw}")))
        })
        .transpose()?;

    let record = ProgressRecord {
        bookmarked: row.try_get::<bool, _>("bookmarked").map_err(ser)?,
        completed: row.try_get::<bool, _>("completed").map_err(ser)?,
        difficulty_rating,
        times_seen,
        last_seen_at: row.try_get("last_seen_at").map_err(ser)?,
    };

    Ok((card_id, record))
}
