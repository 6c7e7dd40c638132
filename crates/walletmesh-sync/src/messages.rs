//! Wire message types exchanged between wallet instances.
//!
//! Three kinds travel on the wire: `state`, `state-request`, `transaction`.
//! An unrecognized kind decodes to [`WireMessage::Unknown`] - a successful
//! decode that no handler acts on.

use walletmesh_core::{TransactionRecord, WalletSnapshot};

/// Wire kind discriminator for `state` messages.
pub const KIND_STATE: &str = "state";
/// Wire kind discriminator for `state-request` messages.
pub const KIND_STATE_REQUEST: &str = "state-request";
/// Wire kind discriminator for `transaction` messages.
pub const KIND_TRANSACTION: &str = "transaction";

/// A decoded wire message.
#[derive(Debug, Clone, PartialEq)]
pub enum WireMessage {
    /// Full wallet state push: balance plus transaction history.
    State(WalletSnapshot),

    /// Ask the peer to push its current state. Carries no payload.
    StateRequest,

    /// A single locally originated transaction, fanned out to all peers.
    Transaction(TransactionRecord),

    /// A structurally valid message of an unrecognized kind.
    ///
    /// Accepted rather than rejected so that a newer peer speaking a
    /// superset of the protocol does not trip the malformed counter.
    Unknown {
        /// The unrecognized discriminator value.
        kind: String,
    },
}

impl WireMessage {
    /// The wire discriminator for this message.
    pub fn kind(&self) -> &str {
        match self {
            WireMessage::State(_) => KIND_STATE,
            WireMessage::StateRequest => KIND_STATE_REQUEST,
            WireMessage::Transaction(_) => KIND_TRANSACTION,
            WireMessage::Unknown { kind } => kind,
        }
    }
}
