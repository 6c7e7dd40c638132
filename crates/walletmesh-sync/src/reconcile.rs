//! SharedView: the reconciliation handle around a [`WalletView`].
//!
//! Every session and the local workflow mutate the same view. The source
//! system relied on a cooperative single-threaded scheduler for its
//! single-writer invariant; on a multi-threaded runtime the same invariant
//! is preserved by a mutex, and no suspension point ever sits inside a
//! critical section.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use walletmesh_core::{Amount, MergeOutcome, TransactionRecord, WalletSnapshot, WalletView};

/// A cloneable handle to the shared wallet view.
///
/// Explicitly owned and passed into sessions and the synchronizer - never a
/// process-wide singleton - so multiple independent wallet instances can
/// coexist in one process (and one test).
#[derive(Clone)]
pub struct SharedView {
    inner: Arc<Mutex<WalletView>>,
}

impl SharedView {
    /// Wrap a fresh view for the named wallet.
    pub fn new(wallet_name: impl Into<String>) -> Self {
        Self::from_view(WalletView::new(wallet_name))
    }

    /// Wrap an existing view.
    pub fn from_view(view: WalletView) -> Self {
        Self {
            inner: Arc::new(Mutex::new(view)),
        }
    }

    /// Current balance.
    pub fn balance(&self) -> Amount {
        self.inner.lock().unwrap().balance()
    }

    /// Length of the transaction history.
    pub fn history_len(&self) -> usize {
        self.inner.lock().unwrap().history().len()
    }

    /// Build a fresh snapshot of the current state.
    pub fn snapshot(&self) -> WalletSnapshot {
        self.inner.lock().unwrap().snapshot()
    }

    /// Merge a peer's snapshot under largest-balance-wins.
    pub fn apply_remote_state(&self, snapshot: &WalletSnapshot) -> MergeOutcome {
        let outcome = self.inner.lock().unwrap().merge_remote(snapshot);
        match &outcome {
            MergeOutcome::Adopted {
                previous,
                adopted,
                appended,
            } => {
                info!(
                    from = %snapshot.wallet_name,
                    %previous,
                    %adopted,
                    appended,
                    "adopted peer state"
                );
            }
            MergeOutcome::Ignored => {
                // A conflicting lower-balance update is discarded silently;
                // there is no escalation path for it.
                debug!(
                    from = %snapshot.wallet_name,
                    balance = %snapshot.balance,
                    "ignored peer state with lower or equal balance"
                );
            }
        }
        outcome
    }

    /// Append a transaction record received from a peer or originated locally.
    pub fn record_transaction(&self, record: TransactionRecord) {
        debug!(tx_id = %record.tx_id, amount = %record.amount, "recording transaction");
        self.inner.lock().unwrap().record_transaction(record);
    }

    /// Fold a locally observed backend balance into the view (max rule).
    pub fn observe_balance(&self, observed: Amount) -> MergeOutcome {
        let outcome = self.inner.lock().unwrap().observe_balance(observed);
        if let MergeOutcome::Adopted { adopted, .. } = &outcome {
            debug!(balance = %adopted, "local balance observation adopted");
        }
        outcome
    }
}
