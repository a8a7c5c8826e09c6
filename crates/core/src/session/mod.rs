mod filter;
mod state;

pub use filter::visible_cards;
pub use state::{SessionEvent, SessionPhase, SessionState, SyncIntent};
