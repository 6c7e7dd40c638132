//! Test fixtures and helpers.
//!
//! Common setup code for unit and integration tests.

use std::sync::Arc;

use walletmesh_backend::{MockWallet, WalletBackend};
use walletmesh_core::{Amount, TransactionRecord, TxId, WalletSnapshot};
use walletmesh_sync::SharedView;

/// A test fixture around one wallet instance's shared view.
pub struct TestFixture {
    pub wallet_name: String,
    pub view: SharedView,
}

impl TestFixture {
    /// Create a fixture with an empty view.
    pub fn new(wallet_name: &str) -> Self {
        Self {
            wallet_name: wallet_name.to_string(),
            view: SharedView::new(wallet_name),
        }
    }

    /// Create a fixture whose view already holds a balance.
    pub fn with_balance(wallet_name: &str, balance: f64) -> Self {
        let fixture = Self::new(wallet_name);
        fixture
            .view
            .observe_balance(Amount::new(balance).expect("valid balance"));
        fixture
    }

    /// Build a transaction record originating from this wallet.
    pub fn make_record(&self, tx_id: &str, amount: f64) -> TransactionRecord {
        TransactionRecord {
            sender: self.wallet_name.clone(),
            recipient: format!("addr-{}", tx_id),
            amount: Amount::new(amount).expect("valid amount"),
            tx_id: TxId::new(tx_id),
        }
    }

    /// Build a snapshot as this wallet would advertise it.
    pub fn make_snapshot(&self, balance: f64, tx_ids: &[&str]) -> WalletSnapshot {
        WalletSnapshot {
            wallet_name: self.wallet_name.clone(),
            balance: Amount::new(balance).expect("valid balance"),
            transactions: tx_ids.iter().map(|id| self.make_record(id, 0.1)).collect(),
        }
    }
}

/// Create a mock backend with a wallet already created and funded.
pub async fn funded_backend(wallet_name: &str, blocks: u32) -> Arc<MockWallet> {
    let backend = Arc::new(MockWallet::new());
    backend
        .create_wallet(wallet_name)
        .await
        .expect("mock create never fails");
    backend
        .fund_with_blocks(wallet_name, blocks)
        .await
        .expect("mock funding never fails");
    backend
}

/// Create multiple fixtures for multi-peer tests.
pub fn multi_peer_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| TestFixture::new(&format!("wallet-{i}")))
        .collect()
}
