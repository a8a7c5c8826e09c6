#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod progress_sync;
pub mod study_session;

pub use otocards_core::Clock;

pub use catalog::CatalogService;
pub use error::{CatalogError, TransportError};
pub use progress_sync::{HttpProgressTransport, ProgressSyncService, ProgressTransport};
pub use study_session::StudySessionService;
