use std::collections::HashMap;

use otocards_core::model::{Card, CardId, Category, ProgressRecord};
use otocards_core::session::{SessionEvent, SessionState, SyncIntent};

use crate::catalog::CatalogService;
use crate::progress_sync::ProgressSyncService;

/// Drives one study session: owns the loaded catalog and the session state
/// machine, and routes emitted sync intents to the progress sync layer.
///
/// All UI-facing entry points are thin wrappers that feed a single event
/// into the machine, so behavior stays testable without any rendering or
/// visibility API.
pub struct StudySessionService {
    catalog: Vec<Card>,
    state: SessionState,
    sync: ProgressSyncService,
}

impl StudySessionService {
    /// Load the catalog and progress, then enter the active phase.
    ///
    /// Both fetches degrade gracefully (bundled catalog, empty progress);
    /// starting a session never fails.
    pub async fn start(
        catalog_service: &CatalogService,
        sync: ProgressSyncService,
        authenticated: bool,
        stack: Option<&str>,
    ) -> Self {
        let catalog = catalog_service.fetch(stack, None).await;
        Self::start_with_catalog(catalog, sync, authenticated).await
    }

    /// Start from an already-loaded catalog. Used directly by tests and by
    /// hosts that embed their own catalog source.
    pub async fn start_with_catalog(
        catalog: Vec<Card>,
        sync: ProgressSyncService,
        authenticated: bool,
    ) -> Self {
        let mut state = SessionState::new(authenticated);
        if authenticated {
            state.seed_progress(&sync.initial_progress().await);
        }
        state.activate(&catalog);
        Self {
            catalog,
            state,
            sync,
        }
    }

    /// A card became the dominant visible item.
    pub async fn card_dominant(&mut self, card_id: CardId) {
        self.handle(SessionEvent::CardDominant(card_id)).await;
    }

    /// Toggle the bookmark on a card.
    pub async fn toggle_bookmark(&mut self, card_id: CardId) {
        self.handle(SessionEvent::BookmarkToggled(card_id)).await;
    }

    /// An interactive card reported a correct or incorrect answer.
    pub async fn submit_answer(&mut self, card_id: CardId, correct: bool) {
        self.handle(SessionEvent::AnswerSubmitted { card_id, correct })
            .await;
    }

    /// The user rated a card's difficulty (1..=5).
    pub async fn rate_difficulty(&mut self, card_id: CardId, rating: u8) {
        self.handle(SessionEvent::DifficultyRated { card_id, rating })
            .await;
    }

    /// Switch the category filter.
    pub async fn select_category(&mut self, category: Option<Category>) {
        self.handle(SessionEvent::CategorySelected(category)).await;
    }

    /// Leave the all-reviewed state and show every card again.
    pub async fn review_again(&mut self) {
        self.handle(SessionEvent::ReviewAgain).await;
    }

    /// The ordered deck currently eligible for display.
    #[must_use]
    pub fn deck(&self) -> Vec<&Card> {
        self.state.deck(&self.catalog)
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn catalog(&self) -> &[Card] {
        &self.catalog
    }

    async fn handle(&mut self, event: SessionEvent) {
        let intents: Vec<SyncIntent> = self.state.apply(event, &self.catalog);
        for intent in intents {
            self.sync.dispatch(intent).await;
        }
    }

    /// Session seeding for hosts that fetched progress themselves.
    pub fn seeded(
        catalog: Vec<Card>,
        records: &HashMap<CardId, ProgressRecord>,
        sync: ProgressSyncService,
    ) -> Self {
        let mut state = SessionState::new(true);
        state.seed_progress(records);
        state.activate(&catalog);
        Self {
            catalog,
            state,
            sync,
        }
    }
}
