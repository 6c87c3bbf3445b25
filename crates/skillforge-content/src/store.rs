use async_trait::async_trait;
use thiserror::Error;

use skillforge_types::ContentId;

/// Errors from the pinning boundary.
///
/// Both variants are transient from the caller's point of view: no partial
/// state is left behind and the whole operation may be retried from
/// scratch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("pinning service rejected the blob: {0}")]
    PinRejected(String),

    #[error("content store transport error: {0}")]
    Transport(String),
}

/// External content-addressed blob store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Pin an opaque byte blob and return its content-addressed id.
    ///
    /// Pinning identical bytes twice must return the same id.
    async fn pin(&self, bytes: &[u8]) -> Result<ContentId, ContentError>;
}
