use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::{
    Card, CardId, Category, ProgressRecord, MAX_DIFFICULTY_RATING, MIN_DIFFICULTY_RATING,
};
use crate::session::filter::visible_cards;

//
// ─── EVENTS & INTENTS ──────────────────────────────────────────────────────────
//

/// Discrete inputs to the session state machine.
///
/// `CardDominant` is the generic "dominant-item-changed" signal: whatever the
/// host environment uses to decide that a card became the primary visible
/// item (an intersection observer, a scroll tracker, a synthetic test feed)
/// is reduced to this one event before it reaches the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    CardDominant(CardId),
    BookmarkToggled(CardId),
    AnswerSubmitted { card_id: CardId, correct: bool },
    DifficultyRated { card_id: CardId, rating: u8 },
    CategorySelected(Option<Category>),
    ReviewAgain,
}

/// Persistence side effects emitted by a transition.
///
/// Intents are fire-and-forget: the sync layer dispatches them without
/// feeding anything back into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncIntent {
    MarkSeen(CardId),
    SetBookmark(CardId, bool),
    SetCompleted(CardId, bool),
    RateDifficulty(CardId, u8),
}

/// Top-level phase of a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Active,
    AllReviewed,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Client-local state of one study session.
///
/// Created fresh on mount, seeded from the Progress Store for authenticated
/// users, and discarded at session end. All transitions are synchronous and
/// deterministic; every mutation goes through [`SessionState::apply`] (or the
/// loading-phase methods) and returns the sync intents it produced.
pub struct SessionState {
    phase: SessionPhase,
    active_index: usize,
    bookmarked: HashSet<CardId>,
    seen_cards: HashSet<CardId>,
    marked_seen: HashSet<CardId>,
    selected_category: Option<Category>,
    show_all_cards: bool,
    streak: u32,
    show_swipe_hint: bool,
    authenticated: bool,
}

impl SessionState {
    /// Fresh session in the `Loading` phase.
    #[must_use]
    pub fn new(authenticated: bool) -> Self {
        Self {
            phase: SessionPhase::Loading,
            active_index: 0,
            bookmarked: HashSet::new(),
            seen_cards: HashSet::new(),
            marked_seen: HashSet::new(),
            selected_category: None,
            show_all_cards: false,
            streak: 0,
            show_swipe_hint: true,
            authenticated,
        }
    }

    /// Seed bookmark and seen sets from fetched progress records.
    ///
    /// A bookmarked card never lands in `seen_cards`: bookmarks keep cards
    /// visible regardless of their seen history. The `marked_seen` de-dup
    /// guard is session-local and stays empty here, so a card seen in an
    /// earlier session increments `times_seen` again when re-observed.
    pub fn seed_progress(&mut self, records: &HashMap<CardId, ProgressRecord>) {
        for (card_id, record) in records {
            if record.bookmarked {
                self.bookmarked.insert(card_id.clone());
            } else if record.times_seen > 0 {
                self.seen_cards.insert(card_id.clone());
            }
        }
    }

    /// Leave `Loading` once catalog and progress fetches have settled.
    ///
    /// If the filtered deck is already empty the session lands directly in
    /// `AllReviewed` instead of rendering an empty deck.
    pub fn activate(&mut self, catalog: &[Card]) {
        self.phase = SessionPhase::Active;
        self.refresh_phase(catalog);
    }

    /// Apply one event and return the sync intents it produced.
    pub fn apply(&mut self, event: SessionEvent, catalog: &[Card]) -> Vec<SyncIntent> {
        match event {
            SessionEvent::CardDominant(card_id) => self.on_dominant(&card_id, catalog),
            SessionEvent::BookmarkToggled(card_id) => self.on_bookmark(&card_id, catalog),
            SessionEvent::AnswerSubmitted { card_id, correct } => {
                self.on_answer(&card_id, correct)
            }
            SessionEvent::DifficultyRated { card_id, rating } => self.on_rating(&card_id, rating),
            SessionEvent::CategorySelected(category) => {
                self.selected_category = category;
                self.refresh_phase(catalog);
                Vec::new()
            }
            SessionEvent::ReviewAgain => {
                self.on_review_again();
                Vec::new()
            }
        }
    }

    /// The ordered deck currently eligible for display.
    #[must_use]
    pub fn deck<'a>(&self, catalog: &'a [Card]) -> Vec<&'a Card> {
        visible_cards(
            catalog,
            self.selected_category,
            self.authenticated,
            &self.seen_cards,
            self.show_all_cards,
        )
    }

    // ─── Transition handlers ───────────────────────────────────────────────

    fn on_dominant(&mut self, card_id: &CardId, catalog: &[Card]) -> Vec<SyncIntent> {
        if self.phase != SessionPhase::Active {
            return Vec::new();
        }
        // Dominance events can arrive out of order under fast scrolling and
        // may reference a card no longer in the deck after a category switch.
        let deck = self.deck(catalog);
        let Some(position) = deck.iter().position(|card| card.id == *card_id) else {
            return Vec::new();
        };

        self.active_index = position;
        self.show_swipe_hint = false;

        if !self.authenticated {
            return Vec::new();
        }
        if self.marked_seen.insert(card_id.clone()) {
            vec![SyncIntent::MarkSeen(card_id.clone())]
        } else {
            Vec::new()
        }
    }

    fn on_bookmark(&mut self, card_id: &CardId, catalog: &[Card]) -> Vec<SyncIntent> {
        let bookmarking = !self.bookmarked.contains(card_id);
        if bookmarking {
            self.bookmarked.insert(card_id.clone());
            // Bookmarked cards must stay visible: drop the seen marker so the
            // filter re-admits the card even with show_all_cards off.
            self.seen_cards.remove(card_id);
        } else {
            self.bookmarked.remove(card_id);
        }
        self.refresh_phase(catalog);

        if self.authenticated {
            vec![SyncIntent::SetBookmark(card_id.clone(), bookmarking)]
        } else {
            Vec::new()
        }
    }

    fn on_answer(&mut self, card_id: &CardId, correct: bool) -> Vec<SyncIntent> {
        if correct {
            self.streak = self.streak.saturating_add(1);
            if self.authenticated {
                return vec![SyncIntent::SetCompleted(card_id.clone(), true)];
            }
        } else {
            self.streak = 0;
        }
        Vec::new()
    }

    fn on_rating(&mut self, card_id: &CardId, rating: u8) -> Vec<SyncIntent> {
        if !(MIN_DIFFICULTY_RATING..=MAX_DIFFICULTY_RATING).contains(&rating) {
            return Vec::new();
        }
        if self.authenticated {
            vec![SyncIntent::RateDifficulty(card_id.clone(), rating)]
        } else {
            Vec::new()
        }
    }

    fn on_review_again(&mut self) {
        if self.phase != SessionPhase::AllReviewed {
            return;
        }
        // Only the seen-filter is bypassed; seen_cards and marked_seen stay
        // as they are, so cards observed earlier in this session never emit
        // a second MarkSeen during the review pass.
        self.show_all_cards = true;
        self.active_index = 0;
        self.phase = SessionPhase::Active;
    }

    /// Recompute phase and clamp the active index after any mutation that can
    /// change the deck slice.
    fn refresh_phase(&mut self, catalog: &[Card]) {
        if self.phase == SessionPhase::Loading {
            return;
        }
        let deck_len = self.deck(catalog).len();
        if self.active_index >= deck_len {
            self.active_index = deck_len.saturating_sub(1);
        }
        self.phase = if deck_len == 0 && self.authenticated && !self.show_all_cards {
            SessionPhase::AllReviewed
        } else {
            SessionPhase::Active
        };
    }

    // ─── Accessors ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn show_swipe_hint(&self) -> bool {
        self.show_swipe_hint
    }

    #[must_use]
    pub fn show_all_cards(&self) -> bool {
        self.show_all_cards
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<Category> {
        self.selected_category
    }

    #[must_use]
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn is_bookmarked(&self, card_id: &CardId) -> bool {
        self.bookmarked.contains(card_id)
    }

    #[must_use]
    pub fn bookmarked(&self) -> &HashSet<CardId> {
        &self.bookmarked
    }

    #[must_use]
    pub fn seen_cards(&self) -> &HashSet<CardId> {
        &self.seen_cards
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("phase", &self.phase)
            .field("active_index", &self.active_index)
            .field("bookmarked_len", &self.bookmarked.len())
            .field("seen_len", &self.seen_cards.len())
            .field("marked_seen_len", &self.marked_seen.len())
            .field("selected_category", &self.selected_category)
            .field("show_all_cards", &self.show_all_cards)
            .field("streak", &self.streak)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CardContent, Difficulty};
    use crate::time::fixed_now;

    fn build_card(id: &str, category: Category, seq: u32) -> Card {
        Card {
            id: CardId::new(id),
            stack: "ent-core".to_string(),
            category,
            difficulty: Difficulty::Easy,
            seq,
            content: CardContent::Flashcard {
                front: "Q".to_string(),
                back: "A".to_string(),
            },
        }
    }

    fn catalog() -> Vec<Card> {
        vec![
            build_card("a", Category::Otology, 0),
            build_card("b", Category::Rhinology, 1),
            build_card("c", Category::Otology, 2),
        ]
    }

    fn active_session(catalog: &[Card]) -> SessionState {
        let mut state = SessionState::new(true);
        state.activate(catalog);
        state
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

    #[test]
    fn dominance_marks_seen_exactly_once() {
        let catalog = catalog();
        let mut state = active_session(&catalog);

        let first = state.apply(SessionEvent::CardDominant(CardId::new("a")), &catalog);
        assert_eq!(first, vec![SyncIntent::MarkSeen(CardId::new("a"))]);

        // Revisits and duplicate observer callbacks stay silent.
        for _ in 0..3 {
            let again = state.apply(SessionEvent::CardDominant(CardId::new("a")), &catalog);
            assert!(again.is_empty());
        }
    }

    #[test]
    fn dominance_tracks_index_and_clears_hint() {
        let catalog = catalog();
        let mut state = active_session(&catalog);
        assert!(state.show_swipe_hint());

        state.apply(SessionEvent::CardDominant(CardId::new("b")), &catalog);
        assert_eq!(state.active_index(), 1);
        assert!(!state.show_swipe_hint());
    }

    #[test]
    fn stale_dominance_event_is_ignored() {
        let catalog = catalog();
        let mut state = active_session(&catalog);
        state.apply(
            SessionEvent::CategorySelected(Some(Category::Otology)),
            &catalog,
        );

        // "b" is rhinology and no longer in the deck slice.
        let intents = state.apply(SessionEvent::CardDominant(CardId::new("b")), &catalog);
        assert!(intents.is_empty());
        assert_eq!(state.active_index(), 0);
    }

    #[test]
    fn anonymous_sessions_emit_no_intents() {
        let catalog = catalog();
        let mut state = SessionState::new(false);
        state.activate(&catalog);

        let intents = state.apply(SessionEvent::CardDominant(CardId::new("a")), &catalog);
        assert!(intents.is_empty());
        let intents = state.apply(SessionEvent::BookmarkToggled(CardId::new("a")), &catalog);
        assert!(intents.is_empty());
        assert!(state.is_bookmarked(&CardId::new("a")));
    }

    #[test]
    fn bookmark_readmits_seen_card() {
        let catalog = catalog();
        let mut state = SessionState::new(true);
        let records = HashMap::from([(CardId::new("a"), seen_record(2, false))]);
        state.seed_progress(&records);
        state.activate(&catalog);

        let deck: Vec<_> = state.deck(&catalog).iter().map(|c| c.id.clone()).collect();
        assert!(!deck.contains(&CardId::new("a")));

        let intents = state.apply(SessionEvent::BookmarkToggled(CardId::new("a")), &catalog);
        assert_eq!(intents, vec![SyncIntent::SetBookmark(CardId::new("a"), true)]);

        let deck: Vec<_> = state.deck(&catalog).iter().map(|c| c.id.clone()).collect();
        assert!(deck.contains(&CardId::new("a")));
        assert!(!state.seen_cards().contains(&CardId::new("a")));
    }

    #[test]
    fn seeding_never_hides_bookmarked_cards() {
        let records = HashMap::from([
            (CardId::new("a"), seen_record(5, true)),
            (CardId::new("b"), seen_record(1, false)),
        ]);
        let mut state = SessionState::new(true);
        state.seed_progress(&records);

        assert!(state.is_bookmarked(&CardId::new("a")));
        assert!(!state.seen_cards().contains(&CardId::new("a")));
        assert!(state.seen_cards().contains(&CardId::new("b")));
    }

    #[test]
    fn empty_deck_enters_all_reviewed_and_review_again_recovers() {
        let catalog = catalog();
        let mut state = SessionState::new(true);
        let records: HashMap<_, _> = catalog
            .iter()
            .map(|card| (card.id.clone(), seen_record(1, false)))
            .collect();
        state.seed_progress(&records);
        state.activate(&catalog);

        assert_eq!(state.phase(), SessionPhase::AllReviewed);

        state.apply(SessionEvent::ReviewAgain, &catalog);
        assert_eq!(state.phase(), SessionPhase::Active);
        assert!(state.show_all_cards());
        assert_eq!(state.deck(&catalog).len(), catalog.len());
    }

    #[test]
    fn review_again_outside_terminal_phase_is_a_no_op() {
        let catalog = catalog();
        let mut state = active_session(&catalog);

        state.apply(SessionEvent::ReviewAgain, &catalog);
        assert!(!state.show_all_cards());
    }

    #[test]
    fn review_pass_keeps_session_dedup() {
        let catalog = vec![build_card("a", Category::Otology, 0)];
        let mut state = active_session(&catalog);

        // First pass: card observed and reported.
        let intents = state.apply(SessionEvent::CardDominant(CardId::new("a")), &catalog);
        assert_eq!(intents.len(), 1);

        // Simulate the server-reconciled hide, then the terminal state.
        let records = HashMap::from([(CardId::new("a"), seen_record(1, false))]);
        state.seed_progress(&records);
        state.apply(SessionEvent::CategorySelected(None), &catalog);
        assert_eq!(state.phase(), SessionPhase::AllReviewed);

        // Review pass re-admits the card but never re-reports it.
        state.apply(SessionEvent::ReviewAgain, &catalog);
        let intents = state.apply(SessionEvent::CardDominant(CardId::new("a")), &catalog);
        assert!(intents.is_empty());
    }

    #[test]
    fn anonymous_sessions_never_terminate() {
        let catalog = catalog();
        let mut state = SessionState::new(false);
        state.activate(&catalog);

        state.apply(
            SessionEvent::CategorySelected(Some(Category::HeadNeck)),
            &catalog,
        );
        // Deck is empty but anonymous sessions stay Active.
        assert!(state.deck(&catalog).is_empty());
        assert_eq!(state.phase(), SessionPhase::Active);
    }

    #[test]
    fn category_switch_clamps_active_index() {
        let catalog = catalog();
        let mut state = active_session(&catalog);
        state.apply(SessionEvent::CardDominant(CardId::new("c")), &catalog);
        assert_eq!(state.active_index(), 2);

        state.apply(
            SessionEvent::CategorySelected(Some(Category::Rhinology)),
            &catalog,
        );
        assert_eq!(state.active_index(), 0);
    }

    #[test]
    fn streak_grows_on_correct_and_resets_on_miss() {
        let catalog = catalog();
        let mut state = active_session(&catalog);

        let intents = state.apply(
            SessionEvent::AnswerSubmitted {
                card_id: CardId::new("a"),
                correct: true,
            },
            &catalog,
        );
        assert_eq!(
            intents,
            vec![SyncIntent::SetCompleted(CardId::new("a"), true)]
        );
        assert_eq!(state.streak(), 1);

        state.apply(
            SessionEvent::AnswerSubmitted {
                card_id: CardId::new("b"),
                correct: true,
            },
            &catalog,
        );
        assert_eq!(state.streak(), 2);

        let intents = state.apply(
            SessionEvent::AnswerSubmitted {
                card_id: CardId::new("c"),
                correct: false,
            },
            &catalog,
        );
        assert!(intents.is_empty());
        assert_eq!(state.streak(), 0);
    }

    #[test]
    fn out_of_range_rating_is_dropped() {
        let catalog = catalog();
        let mut state = active_session(&catalog);

        assert!(state
            .apply(
                SessionEvent::DifficultyRated {
                    card_id: CardId::new("a"),
                    rating: 0,
                },
                &catalog,
            )
            .is_empty());
        assert_eq!(
            state.apply(
                SessionEvent::DifficultyRated {
                    card_id: CardId::new("a"),
                    rating: 4,
                },
                &catalog,
            ),
            vec![SyncIntent::RateDifficulty(CardId::new("a"), 4)]
        );
    }

    #[test]
    fn unbookmarking_does_not_rehide_within_session() {
        let catalog = catalog();
        let mut state = SessionState::new(true);
        let records = HashMap::from([(CardId::new("a"), seen_record(3, true))]);
        state.seed_progress(&records);
        state.activate(&catalog);

        let intents = state.apply(SessionEvent::BookmarkToggled(CardId::new("a")), &catalog);
        assert_eq!(
            intents,
            vec![SyncIntent::SetBookmark(CardId::new("a"), false)]
        );
        // The card stays visible until the next progress fetch reconciles it.
        assert!(!state.seen_cards().contains(&CardId::new("a")));
        let deck: Vec<_> = state.deck(&catalog).iter().map(|c| c.id.clone()).collect();
        assert!(deck.contains(&CardId::new("a")));
    }
}
