//! Typed errors for the capture engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Every failure is
//! recovered at the request boundary: the service maps these to a
//! `success: false` response, nothing propagates past the handler.

use thiserror::Error;

use crate::types::message::ExtractionDebug;

/// Errors that can occur during a capture request.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No post container found at or near the interaction point.
    #[error("no post found at the interaction point")]
    LocatorMiss {
        /// The hit landed inside a photo viewer overlay; the user
        /// should back out to the full post first.
        in_media_viewer: bool,
    },

    /// Unexpected failure mid-extraction. No partial record is trusted.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Extraction ran but produced no author, caption, image or video.
    /// Soft failure with a diagnostic payload; nothing is stored.
    #[error("post had no extractable content")]
    InsufficientContent { debug: ExtractionDebug },

    /// The record matched an already-saved post under the active
    /// dedup policy.
    #[error("post already saved")]
    Duplicate,

    /// The persistence collaborator rejected the write. The record is
    /// discarded, not retried or queued.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The supplied snapshot was unusable (dangling node id, empty
    /// arena).
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Errors from `PostStore` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for CaptureError {
    fn from(err: StoreError) -> Self {
        CaptureError::Storage(Box::new(err))
    }
}

/// Result type alias for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;
