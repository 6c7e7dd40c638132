//! # Walletmesh Backend
//!
//! The `WalletBackend` collaborator seam: real cryptographic wallet
//! operations and node RPC live behind this trait, opaque to the
//! synchronization core.
//!
//! All calls are remote and fallible. Retryable failures are distinguished
//! from terminal ones only by the error-code convention in
//! [`ErrorCode`]; transient errors are recovered locally with
//! [`retry::with_retry`] and never surface into the peer protocol.

pub mod backend;
pub mod error;
pub mod mock;
pub mod retry;

pub use backend::{
    create_or_load_wallet, TransactionDetails, WalletBackend, WalletHandle,
};
pub use error::{BackendError, ErrorCode, Result};
pub use mock::MockWallet;
pub use retry::{with_retry, RetryPolicy};
