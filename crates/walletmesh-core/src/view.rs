//! WalletView: the authoritative in-process wallet state.
//!
//! One view exists per wallet instance. Sessions merge remote snapshots into
//! it, the local workflow observes backend balances into it, and every state
//! push is built from a fresh snapshot of it.

use serde::{Deserialize, Serialize};

use crate::types::{Amount, TransactionRecord};

/// Outcome of applying a remote snapshot to the local view.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// The remote balance was strictly greater: it was adopted and the
    /// remote history batch was appended.
    Adopted {
        /// Balance before the merge.
        previous: Amount,
        /// Balance after the merge.
        adopted: Amount,
        /// Number of history records appended.
        appended: usize,
    },
    /// The remote balance was less than or equal to ours: complete no-op.
    Ignored,
}

impl MergeOutcome {
    /// Check whether the remote state was adopted.
    pub fn is_adopted(&self) -> bool {
        matches!(self, MergeOutcome::Adopted { .. })
    }
}

/// A point-in-time copy of a wallet view.
///
/// This is the payload of a `state` wire message. It is always built fresh
/// at push time, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSnapshot {
    /// Name of the wallet that produced this snapshot.
    pub wallet_name: String,
    /// Balance at snapshot time.
    pub balance: Amount,
    /// Full transaction history at snapshot time.
    pub transactions: Vec<TransactionRecord>,
}

/// The shared, mutable, process-local wallet state.
///
/// Invariant: `balance` at any observation point equals the maximum balance
/// ever applied, locally observed or received from any peer. This is not a
/// ledger sum; it is the largest-balance-wins rule inherited from the wire
/// protocol, and it has no defense against a peer advertising an arbitrarily
/// large balance. That weakness is accepted, not hardened.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletView {
    wallet_name: String,
    balance: Amount,
    history: Vec<TransactionRecord>,
}

impl WalletView {
    /// Create an empty view for the named wallet.
    pub fn new(wallet_name: impl Into<String>) -> Self {
        Self {
            wallet_name: wallet_name.into(),
            balance: Amount::ZERO,
            history: Vec::new(),
        }
    }

    /// The wallet name. Immutable after creation.
    pub fn wallet_name(&self) -> &str {
        &self.wallet_name
    }

    /// Current balance.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// The transaction history, in arrival order.
    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Apply a locally observed balance (e.g. fetched from the wallet
    /// backend) through the same max rule used for remote state.
    pub fn observe_balance(&mut self, observed: Amount) -> MergeOutcome {
        if observed > self.balance {
            let previous = self.balance;
            self.balance = observed;
            MergeOutcome::Adopted {
                previous,
                adopted: observed,
                appended: 0,
            }
        } else {
            MergeOutcome::Ignored
        }
    }

    /// Merge a remote snapshot: largest-balance-wins.
    ///
    /// If the remote balance is strictly greater than ours, adopt it and
    /// append the remote history as a batch. Otherwise the snapshot is a
    /// complete no-op: neither balance nor history is touched.
    pub fn merge_remote(&mut self, snapshot: &WalletSnapshot) -> MergeOutcome {
        if snapshot.balance > self.balance {
            let previous = self.balance;
            self.balance = snapshot.balance;
            self.history.extend(snapshot.transactions.iter().cloned());
            MergeOutcome::Adopted {
                previous,
                adopted: snapshot.balance,
                appended: snapshot.transactions.len(),
            }
        } else {
            MergeOutcome::Ignored
        }
    }

    /// Append one transaction record, unconditionally.
    ///
    /// No idempotence check: re-receiving the same record from k peers
    /// appends k entries. A dedup set keyed on `tx_id` would change that,
    /// and is deliberately not implemented.
    pub fn record_transaction(&mut self, record: TransactionRecord) {
        self.history.push(record);
    }

    /// Build a snapshot of the current state.
    pub fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            wallet_name: self.wallet_name.clone(),
            balance: self.balance,
            transactions: self.history.clone(),
        }
    }
}
