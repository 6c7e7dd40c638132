//! WalletBackend trait: the abstract interface to real wallet operations.
//!
//! Seed generation, address derivation, transaction signing, and node RPC
//! all live behind this trait. Implementations include an RPC-backed one in
//! deployments and [`crate::MockWallet`] for tests.

use async_trait::async_trait;

use walletmesh_core::{Address, Amount, TxId};

use crate::error::{ErrorCode, Result};

/// Handle to a created or loaded wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletHandle {
    /// The wallet's name.
    pub name: String,
    /// Seed phrase, present only when the wallet was freshly created.
    pub seed: Option<String>,
}

/// Confirmation details for a transaction known to the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetails {
    /// The transaction id.
    pub tx_id: TxId,
    /// Confirmation count at query time.
    pub confirmations: u32,
}

/// The wallet backend collaborator.
///
/// All methods are remote calls and may fail with any [`crate::ErrorCode`];
/// callers decide retryability via [`crate::BackendError::is_retryable`].
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Create a new wallet. Fails with `AlreadyLoaded` if it exists.
    async fn create_wallet(&self, name: &str) -> Result<WalletHandle>;

    /// Load an existing wallet. Fails with `WalletNotFound` otherwise.
    async fn load_wallet(&self, name: &str) -> Result<WalletHandle>;

    /// Mine/credit `blocks` worth of funds to the wallet.
    async fn fund_with_blocks(&self, name: &str, blocks: u32) -> Result<()>;

    /// Current spendable balance.
    async fn balance(&self, name: &str) -> Result<Amount>;

    /// Derive a fresh receiving address.
    async fn new_address(&self, name: &str) -> Result<Address>;

    /// Sign and broadcast a payment; returns the node-assigned id.
    async fn send_payment(&self, name: &str, to: &Address, amount: Amount) -> Result<TxId>;

    /// Confirmation status. Fails with `TransactionNotFound` until the node
    /// has indexed the transaction.
    async fn transaction_status(&self, tx_id: &TxId) -> Result<TransactionDetails>;
}

/// Create the wallet, falling back to loading it when it already exists.
///
/// This is the idempotent branch that keeps "already loaded" out of the
/// fatal path; every other error propagates.
pub async fn create_or_load_wallet<B: WalletBackend + ?Sized>(
    backend: &B,
    name: &str,
) -> Result<WalletHandle> {
    match backend.create_wallet(name).await {
        Ok(handle) => Ok(handle),
        Err(error) if error.code() == ErrorCode::AlreadyLoaded => backend.load_wallet(name).await,
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockWallet;

    #[tokio::test]
    async fn test_create_or_load_creates_fresh_wallet() {
        let backend = MockWallet::new();
        let handle = create_or_load_wallet(&backend, "alice").await.unwrap();
        assert_eq!(handle.name, "alice");
        assert!(handle.seed.is_some());
    }

    #[tokio::test]
    async fn test_create_or_load_falls_back_to_load() {
        let backend = MockWallet::new();
        create_or_load_wallet(&backend, "alice").await.unwrap();

        let handle = create_or_load_wallet(&backend, "alice").await.unwrap();
        assert_eq!(handle.name, "alice");
        // No seed on load: it was only revealed at creation.
        assert!(handle.seed.is_none());
    }
}
