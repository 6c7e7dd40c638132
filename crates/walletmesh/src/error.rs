//! Error types for the node.

use thiserror::Error;

use walletmesh_backend::BackendError;
use walletmesh_core::CoreError;
use walletmesh_sync::SyncError;

use crate::config::ConfigError;

/// Errors that can occur during node operations.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Invalid node configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Wallet backend failure that survived (or bypassed) the retry policy.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Synchronization failure.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// Invalid core value.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, NodeError>;
