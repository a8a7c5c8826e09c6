use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive range of user difficulty ratings.
pub const MIN_DIFFICULTY_RATING: u8 = 1;
pub const MAX_DIFFICULTY_RATING: u8 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("difficulty rating out of range: {0}")]
    RatingOutOfRange(u8),
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Per-(user, card) progress state as stored by the Progress Store.
///
/// `times_seen` is monotonically non-decreasing: it is incremented once per
/// distinct seen event and never reset or overwritten by field updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub bookmarked: bool,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_rating: Option<u8>,
    pub times_seen: u32,
    pub last_seen_at: DateTime<Utc>,
}

impl ProgressRecord {
    /// Record created by the first seen event for a card.
    #[must_use]
    pub fn first_seen(now: DateTime<Utc>) -> Self {
        Self {
            bookmarked: false,
            completed: false,
            difficulty_rating: None,
            times_seen: 1,
            last_seen_at: now,
        }
    }

    /// Record created by a field update (bookmark/completion/rating) before
    /// any seen event was stored. Counts as the first sighting.
    #[must_use]
    pub fn from_update(update: &ProgressUpdate, now: DateTime<Utc>) -> Self {
        let mut record = Self::first_seen(now);
        record.apply_update(update);
        record
    }

    /// Apply a seen event: bump the counter and refresh the timestamp.
    pub fn record_seen(&mut self, now: DateTime<Utc>) {
        self.times_seen = self.times_seen.saturating_add(1);
        self.last_seen_at = now;
    }

    /// Apply a field update. Absent fields are left untouched; `times_seen`
    /// is never modified here.
    pub fn apply_update(&mut self, update: &ProgressUpdate) {
        if let Some(bookmarked) = update.bookmarked {
            self.bookmarked = bookmarked;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        if let Some(rating) = update.difficulty_rating {
            self.difficulty_rating = Some(rating);
        }
    }
}

//
// ─── PROGRESS UPDATE ───────────────────────────────────────────────────────────
//

/// Partial field update for a progress record. Every field is optional so a
/// single upsert shape covers bookmark toggles, completion marks and ratings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmarked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_rating: Option<u8>,
}

impl ProgressUpdate {
    #[must_use]
    pub fn bookmark(value: bool) -> Self {
        Self {
            bookmarked: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn complete(value: bool) -> Self {
        Self {
            completed: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn rating(value: u8) -> Self {
        Self {
            difficulty_rating: Some(value),
            ..Self::default()
        }
    }

    /// Returns true when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookmarked.is_none() && self.completed.is_none() && self.difficulty_rating.is_none()
    }

    /// Validate field ranges.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::RatingOutOfRange` for ratings outside 1..=5.
    pub fn validate(&self) -> Result<(), ProgressError> {
        if let Some(rating) = self.difficulty_rating {
            if !(MIN_DIFFICULTY_RATING..=MAX_DIFFICULTY_RATING).contains(&rating) {
                return Err(ProgressError::RatingOutOfRange(rating));
            }
        }
        Ok(())
    }
}

//
// ─── PROGRESS SUMMARY ──────────────────────────────────────────────────────────
//

/// Per-user seen/bookmarked/completed counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub seen: u32,
    pub bookmarked: u32,
    pub completed: u32,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn seen_events_increment_monotonically() {
        let now = fixed_now();
        let mut record = ProgressRecord::first_seen(now);
        assert_eq!(record.times_seen, 1);

        let later = now + chrono::Duration::minutes(5);
        record.record_seen(later);
        assert_eq!(record.times_seen, 2);
        assert_eq!(record.last_seen_at, later);
    }

    #[test]
    fn field_update_leaves_times_seen_alone() {
        let now = fixed_now();
        let mut record = ProgressRecord::first_seen(now);
        record.record_seen(now);

        record.apply_update(&ProgressUpdate::bookmark(true));
        assert_eq!(record.times_seen, 2);
        assert!(record.bookmarked);
        assert!(!record.completed);
    }

    #[test]
    fn update_created_record_counts_one_sighting() {
        let record = ProgressRecord::from_update(&ProgressUpdate::bookmark(true), fixed_now());
        assert_eq!(record.times_seen, 1);
        assert!(record.bookmarked);
    }

    #[test]
    fn rating_validation_bounds() {
        assert!(ProgressUpdate::rating(1).validate().is_ok());
        assert!(ProgressUpdate::rating(5).validate().is_ok());
        assert!(matches!(
            ProgressUpdate::rating(0).validate(),
            Err(ProgressError::RatingOutOfRange(0))
        ));
        assert!(ProgressUpdate::rating(6).validate().is_err());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(ProgressUpdate::default().is_empty());
        assert!(!ProgressUpdate::complete(true).is_empty());
    }
}
