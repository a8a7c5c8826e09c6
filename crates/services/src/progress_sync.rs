use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use otocards_core::model::{CardId, ProgressRecord, ProgressUpdate, UserId};
use otocards_core::session::SyncIntent;
use serde_json::json;

use crate::error::TransportError;

/// Header carrying the verified user identity, injected by the upstream auth
/// layer in front of the Progress API.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Wire access to the Progress API.
///
/// Abstracted behind a trait so headless tests can substitute a recording
/// fake for the HTTP implementation.
#[async_trait]
pub trait ProgressTransport: Send + Sync {
    /// Fetch all progress records for the current user.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on auth or transport failures.
    async fn fetch_progress(&self) -> Result<HashMap<CardId, ProgressRecord>, TransportError>;

    /// Issue a seen-increment upsert for one card.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on auth or transport failures.
    async fn put_seen(&self, card_id: &CardId) -> Result<(), TransportError>;

    /// Issue a field-update upsert for one card.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on auth or transport failures.
    async fn put_fields(
        &self,
        card_id: &CardId,
        update: &ProgressUpdate,
    ) -> Result<(), TransportError>;
}

//
// ─── HTTP TRANSPORT ────────────────────────────────────────────────────────────
//

/// `ProgressTransport` over HTTP against the Progress API.
#[derive(Clone)]
pub struct HttpProgressTransport {
    base_url: String,
    user_id: UserId,
    client: reqwest::Client,
}

impl HttpProgressTransport {
    #[must_use]
    pub fn new(base_url: impl Into<String>, user_id: UserId) -> Self {
        Self {
            base_url: base_url.into(),
            user_id,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn put(&self, body: serde_json::Value) -> Result<(), TransportError> {
        let response = self
            .client
            .put(self.url("/progress"))
            .header(USER_ID_HEADER, self.user_id.to_string())
            .json(&body)
            .send()
            .await?;
        check_status(response.status())
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), TransportError> {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(TransportError::Unauthenticated);
    }
    if !status.is_success() {
        return Err(TransportError::HttpStatus(status));
    }
    Ok(())
}

#[async_trait]
impl ProgressTransport for HttpProgressTransport {
    async fn fetch_progress(&self) -> Result<HashMap<CardId, ProgressRecord>, TransportError> {
        let response = self
            .client
            .get(self.url("/progress"))
            .header(USER_ID_HEADER, self.user_id.to_string())
            .send()
            .await?;
        check_status(response.status())?;
        Ok(response.json().await?)
    }

    async fn put_seen(&self, card_id: &CardId) -> Result<(), TransportError> {
        self.put(json!({ "cardId": card_id, "seen": true })).await
    }

    async fn put_fields(
        &self,
        card_id: &CardId,
        update: &ProgressUpdate,
    ) -> Result<(), TransportError> {
        let mut body = json!({ "cardId": card_id });
        if let (Some(map), Ok(serde_json::Value::Object(fields))) =
            (body.as_object_mut(), serde_json::to_value(update))
        {
            map.extend(fields);
        }
        self.put(body).await
    }
}

//
// ─── SYNC SERVICE ──────────────────────────────────────────────────────────────
//

/// Fire-and-forget dispatcher for the sync intents emitted by the session
/// state machine.
///
/// Every failure is logged and swallowed: a lost write is acceptable here,
/// a blocked swipe is not. No retries are attempted, and local optimistic
/// state is never rolled back.
#[derive(Clone)]
pub struct ProgressSyncService {
    transport: Arc<dyn ProgressTransport>,
}

impl ProgressSyncService {
    #[must_use]
    pub fn new(transport: Arc<dyn ProgressTransport>) -> Self {
        Self { transport }
    }

    /// Initial progress fetch for session seeding.
    ///
    /// A failed fetch degrades to "no progress": the user studies with empty
    /// seen/bookmark sets rather than seeing an error.
    pub async fn initial_progress(&self) -> HashMap<CardId, ProgressRecord> {
        match self.transport.fetch_progress().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(error = %err, "progress fetch failed, starting with empty progress");
                HashMap::new()
            }
        }
    }

    /// Dispatch one sync intent, swallowing any failure.
    pub async fn dispatch(&self, intent: SyncIntent) {
        let result = match &intent {
            SyncIntent::MarkSeen(card_id) => self.transport.put_seen(card_id).await,
            SyncIntent::SetBookmark(card_id, value) => {
                self.transport
                    .put_fields(card_id, &ProgressUpdate::bookmark(*value))
                    .await
            }
            SyncIntent::SetCompleted(card_id, value) => {
                self.transport
                    .put_fields(card_id, &ProgressUpdate::complete(*value))
                    .await
            }
            SyncIntent::RateDifficulty(card_id, rating) => {
                self.transport
                    .put_fields(card_id, &ProgressUpdate::rating(*rating))
                    .await
            }
        };

        if let Err(err) = result {
            tracing::warn!(error = %err, intent = ?intent, "progress sync failed, dropping update");
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
