//! Golden wire vectors.
//!
//! Literal JSON as it appears on the wire, paired with the kind it must
//! decode to. These pin the protocol encoding across releases: a codec
//! change that breaks one of these breaks interop with deployed peers.

use walletmesh_core::Amount;
use walletmesh_sync::{decode, WireMessage};

/// One golden wire vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// What the vector exercises.
    pub description: &'static str,
    /// The exact bytes as they travel on the wire.
    pub json: &'static str,
    /// The kind the decoded message must report.
    pub expected_kind: &'static str,
}

/// Get all golden wire vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "state with history",
            description: "a full state push carrying one transaction",
            json: r#"{"type":"state","data":{"walletName":"alice","balance":0.5,"transactions":[{"sender":"alice","recipient":"bcrt1qdest","amount":0.1,"txId":"a1b2c3"}]}}"#,
            expected_kind: "state",
        },
        GoldenVector {
            name: "state with empty history",
            description: "a state push from a wallet that has never transacted",
            json: r#"{"type":"state","data":{"walletName":"bob","balance":0,"transactions":[]}}"#,
            expected_kind: "state",
        },
        GoldenVector {
            name: "state request",
            description: "a payload-free request for the peer's current state",
            json: r#"{"type":"state-request"}"#,
            expected_kind: "state-request",
        },
        GoldenVector {
            name: "transaction",
            description: "a single transaction fanned out after a local send",
            json: r#"{"type":"transaction","data":{"sender":"alice","recipient":"bcrt1qdest","amount":0.25,"txId":"deadbeef"}}"#,
            expected_kind: "transaction",
        },
        GoldenVector {
            name: "unknown kind",
            description: "a structurally valid message from a newer peer; decodes without error",
            json: r#"{"type":"gossip","data":{"anything":true}}"#,
            expected_kind: "gossip",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_decode_to_expected_kind() {
        for vector in all_vectors() {
            let message = decode(vector.json.as_bytes())
                .unwrap_or_else(|e| panic!("vector '{}' failed to decode: {e}", vector.name));
            assert_eq!(
                message.kind(),
                vector.expected_kind,
                "vector '{}' decoded to the wrong kind",
                vector.name
            );
        }
    }

    #[test]
    fn test_state_vector_payload_values() {
        let vector = &all_vectors()[0];
        let WireMessage::State(snapshot) = decode(vector.json.as_bytes()).unwrap() else {
            panic!("expected state message");
        };
        assert_eq!(snapshot.wallet_name, "alice");
        assert_eq!(snapshot.balance, Amount::new(0.5).unwrap());
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.transactions[0].tx_id.as_str(), "a1b2c3");
    }

    #[test]
    fn test_transaction_vector_payload_values() {
        let vector = all_vectors()
            .into_iter()
            .find(|v| v.name == "transaction")
            .unwrap();
        let WireMessage::Transaction(record) = decode(vector.json.as_bytes()).unwrap() else {
            panic!("expected transaction message");
        };
        assert_eq!(record.sender, "alice");
        assert_eq!(record.amount, Amount::new(0.25).unwrap());
    }
}
