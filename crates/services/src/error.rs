//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by `CatalogService` before falling back to the bundled deck.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by a `ProgressTransport`.
///
/// These never propagate past the sync layer: progress persistence is
/// best-effort and must not block card navigation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("progress endpoint rejected the request: not authenticated")]
    Unauthenticated,
    #[error("progress request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
