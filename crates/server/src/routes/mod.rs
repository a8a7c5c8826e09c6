use axum::Router;
use axum::routing::get;

use crate::state::AppState;

mod cards;
mod progress;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cards", get(cards::list))
        .route("/progress", get(progress::fetch).put(progress::upsert))
        .route("/progress/summary", get(progress::summary))
        .with_state(state)
}
