use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use otocards_core::model::{Card, Category};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CardsQuery {
    #[serde(default)]
    stack: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// `GET /cards?stack=&category=`: the card catalog, ordered by the
/// externally assigned sequence. Public: anonymous sessions study from the
/// same catalog.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CardsQuery>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let category = query
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let cards = state
        .storage()
        .cards
        .list_cards(query.stack.as_deref(), category)
        .await?;
    Ok(Json(cards))
}
