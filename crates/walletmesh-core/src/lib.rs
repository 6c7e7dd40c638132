//! # Walletmesh Core
//!
//! Pure primitives for walletmesh: wallet views, transaction records, and the
//! reconciliation rules that merge a peer's advertised state into the local one.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over wallet state.
//!
//! ## Key Types
//!
//! - [`WalletView`] - The authoritative in-process wallet state (balance + history)
//! - [`WalletSnapshot`] - A point-in-time copy of the view, used as the `state` wire payload
//! - [`TransactionRecord`] - One payment as it travels between peers
//! - [`Amount`] - A validated non-negative decimal amount
//!
//! ## Reconciliation
//!
//! The merge rule is **largest-balance-wins**: a remote snapshot replaces the
//! local balance only when its balance is strictly greater, and the remote
//! history is appended as a batch in that case. See [`WalletView::merge_remote`].

pub mod error;
pub mod types;
pub mod view;

pub use error::CoreError;
pub use types::{Address, Amount, TransactionRecord, TxId};
pub use view::{MergeOutcome, WalletSnapshot, WalletView};
