//! Error types for walletmesh core.

use thiserror::Error;

/// Errors that can occur while constructing core wallet values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid amount: {0} (must be finite and non-negative)")]
    InvalidAmount(f64),
}
