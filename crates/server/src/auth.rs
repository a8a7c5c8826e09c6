use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use otocards_core::model::UserId;

use crate::error::ApiError;

/// Header carrying the verified user identity.
///
/// Credential verification happens upstream (the auth layer terminates the
/// session token and injects this header); this server only ever observes
/// "authenticated as user X" or nothing.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated user on protected routes.
///
/// A missing or malformed header is a `401`, which clients surface as the
/// anonymous experience rather than an error dialog.
pub struct AuthUser(pub UserId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let user_id = raw
            .trim()
            .parse::<UserId>()
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(Self(user_id))
    }
}
