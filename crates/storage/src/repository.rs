use async_trait::async_trait;
use chrono::{DateTime, Utc};
use otocards_core::model::{
    Card, CardId, Category, ProgressRecord, ProgressSummary, ProgressUpdate, UserId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the card catalog.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Persist or update a catalog card, keyed by its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the card cannot be stored.
    async fn upsert_card(&self, card: &Card) -> Result<(), StorageError>;

    /// List cards, optionally restricted to a stack and/or category,
    /// ordered by the externally assigned sequence number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_cards(
        &self,
        stack: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Card>, StorageError>;
}

/// Repository contract for per-(user, card) progress rows.
///
/// All writes are upserts so concurrent, out-of-order deliveries from one
/// user's client stay safe: `record_seen` is a relative increment and
/// `update_fields` touches only the fields present in the update.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Apply one seen event: create the row with `times_seen = 1` or
    /// increment the counter, refreshing `last_seen_at` either way.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be written.
    async fn record_seen(
        &self,
        user: UserId,
        card_id: &CardId,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Apply a field update: create the row (counting one sighting) or set
    /// the provided fields, leaving `times_seen` untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be written.
    async fn update_fields(
        &self,
        user: UserId,
        card_id: &CardId,
        update: &ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Fetch all progress rows for a user, keyed by card id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn progress_for_user(
        &self,
        user: UserId,
    ) -> Result<HashMap<CardId, ProgressRecord>, StorageError>;

    /// Seen/bookmarked/completed counters for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn summary_for_user(&self, user: UserId) -> Result<ProgressSummary, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    cards: Arc<Mutex<Vec<Card>>>,
    progress: Arc<Mutex<HashMap<(UserId, CardId), ProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardRepository for InMemoryRepository {
    async fn upsert_card(&self, card: &Card) -> Result<(), StorageError> {
        let mut guard = self
            .cards
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.iter_mut().find(|existing| existing.id == card.id) {
            Some(existing) => *existing = card.clone(),
            None => guard.push(card.clone()),
        }
        Ok(())
    }

    async fn list_cards(
        &self,
        stack: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Card>, StorageError> {
        let guard = self
            .cards
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut cards: Vec<Card> = guard
            .iter()
            .filter(|card| stack.is_none_or(|s| card.stack == s))
            .filter(|card| category.is_none_or(|c| card.category == c))
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.seq.cmp(&b.seq).then_with(|| a.id.cmp(&b.id)));
        Ok(cards)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn record_seen(
        &self,
        user: UserId,
        card_id: &CardId,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry((user, card_id.clone()))
            .and_modify(|record| record.record_seen(now))
            .or_insert_with(|| ProgressRecord::first_seen(now));
        Ok(())
    }

    async fn update_fields(
        &self,
        user: UserId,
        card_id: &CardId,
        update: &ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry((user, card_id.clone()))
            .and_modify(|record| record.apply_update(update))
            .or_insert_with(|| ProgressRecord::from_update(update, now));
        Ok(())
    }

    async fn progress_for_user(
        &self,
        user: UserId,
    ) -> Result<HashMap<CardId, ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|((owner, _), _)| *owner == user)
            .map(|((_, card_id), record)| (card_id.clone(), record.clone()))
            .collect())
    }

    async fn summary_for_user(&self, user: UserId) -> Result<ProgressSummary, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut summary = ProgressSummary::default();
        for ((owner, _), record) in guard.iter() {
            if *owner != user {
                continue;
            }
            if record.times_seen > 0 {
                summary.seen += 1;
            }
            if record.bookmarked {
                summary.bookmarked += 1;
            }
            if record.completed {
                summary.completed += 1;
            }
        }
        Ok(summary)
    }
}

/// Aggregates the catalog and progress repositories behind trait objects for
/// easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub cards: Arc<dyn CardRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let cards: Arc<dyn CardRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { cards, progress }
    }
}
