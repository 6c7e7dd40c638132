//! In-memory wallet backend.
//!
//! Primarily for testing. Follows the same error-code convention a real
//! RPC-backed implementation would, and can script transient faults so the
//! retry path is exercisable without a node.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use walletmesh_core::{Address, Amount, TxId};

use crate::backend::{TransactionDetails, WalletBackend, WalletHandle};
use crate::error::{BackendError, ErrorCode, Result};

/// Funds credited per mined block.
const BLOCK_REWARD: f64 = 50.0;

/// In-memory backend implementation. Thread-safe via a mutex.
pub struct MockWallet {
    inner: Mutex<MockWalletInner>,
}

struct MockWalletInner {
    wallets: HashMap<String, f64>,
    transactions: HashMap<TxId, u32>,
    fail_next: u32,
    status_deferrals: u32,
    counter: u64,
}

impl MockWallet {
    /// Create an empty mock backend.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MockWalletInner {
                wallets: HashMap::new(),
                transactions: HashMap::new(),
                fail_next: 0,
                status_deferrals: 0,
                counter: 0,
            }),
        }
    }

    /// Make the next `count` calls fail with `Unavailable`.
    pub fn fail_next(&self, count: u32) {
        self.inner.lock().unwrap().fail_next = count;
    }

    /// Make the next `count` status lookups report `TransactionNotFound`,
    /// simulating a node that has not indexed the transaction yet.
    pub fn defer_status(&self, count: u32) {
        self.inner.lock().unwrap().status_deferrals = count;
    }

    /// Confirm a transaction up to the given depth.
    pub fn confirm(&self, tx_id: &TxId, confirmations: u32) {
        self.inner
            .lock()
            .unwrap()
            .transactions
            .insert(tx_id.clone(), confirmations);
    }
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWalletInner {
    fn check_fault(&mut self) -> Result<()> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(BackendError::unavailable("mock node unreachable"));
        }
        Ok(())
    }

    fn balance_of(&self, name: &str) -> Result<f64> {
        self.wallets
            .get(name)
            .copied()
            .ok_or_else(|| BackendError::wallet_not_found(name))
    }
}

#[async_trait]
impl WalletBackend for MockWallet {
    async fn create_wallet(&self, name: &str) -> Result<WalletHandle> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_fault()?;

        if inner.wallets.contains_key(name) {
            return Err(BackendError::already_loaded(name));
        }
        inner.wallets.insert(name.to_string(), 0.0);
        inner.counter += 1;
        Ok(WalletHandle {
            name: name.to_string(),
            seed: Some(format!("mock-seed-{name}-{:04x}", inner.counter)),
        })
    }

    async fn load_wallet(&self, name: &str) -> Result<WalletHandle> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_fault()?;

        if !inner.wallets.contains_key(name) {
            return Err(BackendError::wallet_not_found(name));
        }
        Ok(WalletHandle {
            name: name.to_string(),
            seed: None,
        })
    }

    async fn fund_with_blocks(&self, name: &str, blocks: u32) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_fault()?;

        let balance = inner.balance_of(name)?;
        inner
            .wallets
            .insert(name.to_string(), balance + f64::from(blocks) * BLOCK_REWARD);
        Ok(())
    }

    async fn balance(&self, name: &str) -> Result<Amount> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_fault()?;

        let balance = inner.balance_of(name)?;
        Amount::new(balance).map_err(|e| BackendError::new(ErrorCode::Internal, e.to_string()))
    }

    async fn new_address(&self, name: &str) -> Result<Address> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_fault()?;

        inner.balance_of(name)?;
        inner.counter += 1;
        Ok(Address::new(format!("mock1{name}{:04}", inner.counter)))
    }

    async fn send_payment(&self, name: &str, to: &Address, amount: Amount) -> Result<TxId> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_fault()?;

        if !amount.is_positive() {
            return Err(BackendError::new(
                ErrorCode::InvalidRequest,
                format!("send amount must be positive, got {amount}"),
            ));
        }

        let balance = inner.balance_of(name)?;
        if balance < amount.value() {
            return Err(BackendError::new(
                ErrorCode::InsufficientFunds,
                format!("balance {balance} is less than {amount} to {to}"),
            ));
        }

        inner
            .wallets
            .insert(name.to_string(), balance - amount.value());
        inner.counter += 1;
        let tx_id = TxId::new(format!("mocktx-{:08x}", inner.counter));
        inner.transactions.insert(tx_id.clone(), 1);
        Ok(tx_id)
    }

    async fn transaction_status(&self, tx_id: &TxId) -> Result<TransactionDetails> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_fault()?;

        if inner.status_deferrals > 0 {
            inner.status_deferrals -= 1;
            return Err(BackendError::transaction_not_found(tx_id.as_str()));
        }

        match inner.transactions.get(tx_id) {
            Some(&confirmations) => Ok(TransactionDetails {
                tx_id: tx_id.clone(),
                confirmations,
            }),
            None => Err(BackendError::transaction_not_found(tx_id.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fund_and_spend() {
        let backend = MockWallet::new();
        backend.create_wallet("alice").await.unwrap();
        backend.fund_with_blocks("alice", 2).await.unwrap();

        assert_eq!(
            backend.balance("alice").await.unwrap(),
            Amount::new(100.0).unwrap()
        );

        let address = backend.new_address("alice").await.unwrap();
        let tx_id = backend
            .send_payment("alice", &address, Amount::new(30.0).unwrap())
            .await
            .unwrap();

        assert_eq!(
            backend.balance("alice").await.unwrap(),
            Amount::new(70.0).unwrap()
        );

        let details = backend.transaction_status(&tx_id).await.unwrap();
        assert_eq!(details.confirmations, 1);
    }

    #[tokio::test]
    async fn test_insufficient_funds() {
        let backend = MockWallet::new();
        backend.create_wallet("alice").await.unwrap();

        let address = backend.new_address("alice").await.unwrap();
        let error = backend
            .send_payment("alice", &address, Amount::new(1.0).unwrap())
            .await
            .unwrap_err();
        assert_eq!(error.code(), ErrorCode::InsufficientFunds);
    }

    #[tokio::test]
    async fn test_scripted_faults_surface_as_unavailable() {
        let backend = MockWallet::new();
        backend.create_wallet("alice").await.unwrap();
        backend.fail_next(1);

        let error = backend.balance("alice").await.unwrap_err();
        assert_eq!(error.code(), ErrorCode::Unavailable);

        // Fault budget spent; subsequent calls succeed.
        assert!(backend.balance("alice").await.is_ok());
    }

    #[tokio::test]
    async fn test_deferred_status_then_found() {
        let backend = MockWallet::new();
        backend.create_wallet("alice").await.unwrap();
        backend.fund_with_blocks("alice", 1).await.unwrap();
        let address = backend.new_address("alice").await.unwrap();
        let tx_id = backend
            .send_payment("alice", &address, Amount::new(1.0).unwrap())
            .await
            .unwrap();

        backend.defer_status(2);
        assert!(backend.transaction_status(&tx_id).await.is_err());
        assert!(backend.transaction_status(&tx_id).await.is_err());
        assert!(backend.transaction_status(&tx_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_wallet_operations_fail() {
        let backend = MockWallet::new();
        let error = backend.balance("ghost").await.unwrap_err();
        assert_eq!(error.code(), ErrorCode::WalletNotFound);
    }
}
