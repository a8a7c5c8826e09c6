use otocards_core::Clock;
use storage::repository::Storage;

/// Shared application state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    storage: Storage,
    clock: Clock,
}

impl AppState {
    #[must_use]
    pub fn new(storage: Storage, clock: Clock) -> Self {
        Self { storage, clock }
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }
}
