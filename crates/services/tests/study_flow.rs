use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use otocards_core::catalog;
use otocards_core::model::{CardId, ProgressRecord, ProgressUpdate};
use otocards_core::session::SessionPhase;
use otocards_core::time::fixed_now;
use services::{ProgressSyncService, ProgressTransport, StudySessionService, TransportError};

/// Transport fake that records every call instead of talking to a server.
#[derive(Default)]
struct RecordingTransport {
    progress: HashMap<CardId, ProgressRecord>,
    seen_calls: Mutex<Vec<CardId>>,
    field_calls: Mutex<Vec<(CardId, ProgressUpdate)>>,
}

impl RecordingTransport {
    fn with_progress(progress: HashMap<CardId, ProgressRecord>) -> Self {
        Self {
            progress,
            ..Self::default()
        }
    }

    fn seen_calls(&self) -> Vec<CardId> {
        self.seen_calls.lock().unwrap().clone()
    }

    fn field_calls(&self) -> Vec<(CardId, ProgressUpdate)> {
        self.field_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressTransport for RecordingTransport {
    async fn fetch_progress(&self) -> Result<HashMap<CardId, ProgressRecord>, TransportError> {
        Ok(self.progress.clone())
    }

    async fn put_seen(&self, card_id: &CardId) -> Result<(), TransportError> {
        self.seen_calls.lock().unwrap().push(card_id.clone());
        Ok(())
    }

    async fn put_fields(
        &self,
        card_id: &CardId,
        update: &ProgressUpdate,
    ) -> Result<(), TransportError> {
        self.field_calls
            .lock()
            .unwrap()
            .push((card_id.clone(), update.clone()));
        Ok(())
    }
}

fn seen_record(times_seen: u32, bookmarked: bool) -> ProgressRecord {
    ProgressRecord {
        bookmarked,
        completed: false,
        difficulty_rating: None,
        times_seen,
        last_seen_at: fixed_now(),
    }
}

#[tokio::test]
async fn full_session_reports_each_card_once() {
    let transport = Arc::new(RecordingTransport::default());
    let sync = ProgressSyncService::new(transport.clone());
    let mut session =
        StudySessionService::start_with_catalog(catalog::bundled(), sync, true).await;

    assert_eq!(session.state().phase(), SessionPhase::Active);
    let deck_ids: Vec<CardId> = session.deck().iter().map(|c| c.id.clone()).collect();

    // Swipe through the whole deck, with a few duplicate dominance events
    // as a real intersection observer produces under fast scrolling.
    for card_id in &deck_ids {
        session.card_dominant(card_id.clone()).await;
        session.card_dominant(card_id.clone()).await;
    }

    let seen = transport.seen_calls();
    assert_eq!(seen.len(), deck_ids.len(), "exactly one markSeen per card");
    assert_eq!(seen, deck_ids);
}

#[tokio::test]
async fn seeded_session_hides_seen_cards_until_review_again() {
    let all = catalog::bundled();
    let records: HashMap<CardId, ProgressRecord> = all
        .iter()
        .map(|card| (card.id.clone(), seen_record(1, false)))
        .collect();

    let transport = Arc::new(RecordingTransport::with_progress(records));
    let sync = ProgressSyncService::new(transport.clone());
    let mut session = StudySessionService::start_with_catalog(all.clone(), sync, true).await;

    // Everything was already reviewed: the session starts terminal.
    assert!(session.deck().is_empty());
    assert_eq!(session.state().phase(), SessionPhase::AllReviewed);

    session.review_again().await;
    assert_eq!(session.state().phase(), SessionPhase::Active);
    assert_eq!(session.deck().len(), all.len());

    // Cards from earlier sessions increment again when re-observed here.
    let first = all[0].id.clone();
    session.card_dominant(first.clone()).await;
    session.card_dominant(first.clone()).await;
    assert_eq!(transport.seen_calls(), vec![first]);
}

#[tokio::test]
async fn bookmarking_syncs_and_readmits_the_card() {
    let all = catalog::bundled();
    let target = all[0].id.clone();
    let records = HashMap::from([(target.clone(), seen_record(3, false))]);

    let transport = Arc::new(RecordingTransport::with_progress(records));
    let sync = ProgressSyncService::new(transport.clone());
    let mut session = StudySessionService::start_with_catalog(all, sync, true).await;

    assert!(!session.deck().iter().any(|c| c.id == target));

    session.toggle_bookmark(target.clone()).await;
    assert!(session.deck().iter().any(|c| c.id == target));

    let fields = transport.field_calls();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].0, target);
    assert_eq!(fields[0].1, ProgressUpdate::bookmark(true));
}

#[tokio::test]
async fn answers_and_ratings_flow_through_the_sync_layer() {
    let transport = Arc::new(RecordingTransport::default());
    let sync = ProgressSyncService::new(transport.clone());
    let mut session =
        StudySessionService::start_with_catalog(catalog::bundled(), sync, true).await;

    let quiz = CardId::new("oto-001");
    session.submit_answer(quiz.clone(), true).await;
    assert_eq!(session.state().streak(), 1);

    session.rate_difficulty(quiz.clone(), 4).await;
    session.submit_answer(CardId::new("hn-002"), false).await;
    assert_eq!(session.state().streak(), 0);

    let fields = transport.field_calls();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].1, ProgressUpdate::complete(true));
    assert_eq!(fields[1].1, ProgressUpdate::rating(4));
}

#[tokio::test]
async fn anonymous_sessions_never_touch_the_transport() {
    let transport = Arc::new(RecordingTransport::default());
    let sync = ProgressSyncService::new(transport.clone());
    let mut session =
        StudySessionService::start_with_catalog(catalog::bundled(), sync, false).await;

    let deck_ids: Vec<CardId> = session.deck().iter().map(|c| c.id.clone()).collect();
    for card_id in deck_ids {
        session.card_dominant(card_id.clone()).await;
        session.toggle_bookmark(card_id).await;
    }

    assert!(transport.seen_calls().is_empty());
    assert!(transport.field_calls().is_empty());
}
