use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use otocards_core::model::{CardId, ProgressRecord, ProgressSummary, ProgressUpdate};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// `PUT /progress` body. Two shapes share one struct: a seen-only event
/// (`{cardId, seen: true}`) or a field update (`{cardId, bookmarked?,
/// completed?, difficultyRating?}`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutProgressBody {
    #[serde(default)]
    card_id: Option<String>,
    #[serde(default)]
    seen: Option<bool>,
    #[serde(flatten)]
    update: ProgressUpdate,
}

/// `GET /progress`: every progress record of the authenticated user,
/// keyed by card id.
pub async fn fetch(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<HashMap<CardId, ProgressRecord>>, ApiError> {
    let progress = state.storage().progress.progress_for_user(user).await?;
    Ok(Json(progress))
}

/// `PUT /progress`: idempotent upsert for one (user, card) pair.
///
/// A seen event increments `times_seen` (or creates the row at 1); a field
/// update sets only the provided fields and never touches `times_seen`.
pub async fn upsert(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<PutProgressBody>,
) -> Result<Json<OkResponse>, ApiError> {
    let card_id = body
        .card_id
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(CardId::new)
        .ok_or_else(|| ApiError::BadRequest("cardId is required".to_string()))?;

    let now = state.clock().now();

    if body.seen == Some(true) {
        state
            .storage()
            .progress
            .record_seen(user, &card_id, now)
            .await?;
    } else if body.update.is_empty() {
        return Err(ApiError::BadRequest(
            "request must set seen or at least one progress field".to_string(),
        ));
    } else {
        body.update
            .validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        state
            .storage()
            .progress
            .update_fields(user, &card_id, &body.update, now)
            .await?;
    }

    Ok(Json(OkResponse { ok: true }))
}

/// `GET /progress/summary`: per-user seen/bookmarked/completed counters.
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProgressSummary>, ApiError> {
    let summary = state.storage().progress.summary_for_user(user).await?;
    Ok(Json(summary))
}
