//! Proptest generators for property-based testing.

use proptest::prelude::*;

use walletmesh_core::{Amount, TransactionRecord, TxId, WalletSnapshot};
use walletmesh_sync::WireMessage;

/// Generate a valid (finite, non-negative) amount.
pub fn amount() -> impl Strategy<Value = Amount> {
    (0.0f64..1_000_000.0).prop_map(|v| Amount::new(v).unwrap())
}

/// Generate a hex-looking transaction id.
pub fn tx_id() -> impl Strategy<Value = TxId> {
    "[0-9a-f]{64}".prop_map(TxId::new)
}

/// Generate a wallet name.
pub fn wallet_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,31}".prop_map(String::from)
}

/// Generate a regtest-looking receiving address.
pub fn address() -> impl Strategy<Value = String> {
    "bcrt1q[0-9a-z]{20,38}".prop_map(String::from)
}

/// Generate a transaction record.
pub fn transaction_record() -> impl Strategy<Value = TransactionRecord> {
    (wallet_name(), address(), amount(), tx_id()).prop_map(
        |(sender, recipient, amount, tx_id)| TransactionRecord {
            sender,
            recipient,
            amount,
            tx_id,
        },
    )
}

/// Generate a wallet snapshot with up to `max_txs` transactions.
pub fn wallet_snapshot_with(max_txs: usize) -> impl Strategy<Value = WalletSnapshot> {
    (
        wallet_name(),
        amount(),
        prop::collection::vec(transaction_record(), 0..=max_txs),
    )
        .prop_map(|(wallet_name, balance, transactions)| WalletSnapshot {
            wallet_name,
            balance,
            transactions,
        })
}

/// Generate a wallet snapshot with up to 8 transactions.
pub fn wallet_snapshot() -> impl Strategy<Value = WalletSnapshot> {
    wallet_snapshot_with(8)
}

/// Generate an encodable wire message (never the unknown-kind variant).
pub fn wire_message() -> impl Strategy<Value = WireMessage> {
    prop_oneof![
        wallet_snapshot().prop_map(WireMessage::State),
        Just(WireMessage::StateRequest),
        transaction_record().prop_map(WireMessage::Transaction),
    ]
}
