//! Error types for the sync crate.

use thiserror::Error;

use crate::codec::CodecError;

/// Errors that can occur during sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Wire message could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Transport-level failure on a link or the swarm itself.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
