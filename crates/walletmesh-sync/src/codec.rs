//! Message codec: JSON objects with a `type` discriminator and a
//! kind-dependent `data` payload.
//!
//! No schema versioning and no length framing; the transport is assumed to
//! deliver whole, non-truncated messages per event.

use bytes::Bytes;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::messages::{WireMessage, KIND_STATE, KIND_STATE_REQUEST, KIND_TRANSACTION};

/// Decode/encode failures for wire messages.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Bytes were not parseable JSON, or a payload had the wrong shape.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Top-level value was not an object.
    #[error("message is not an object")]
    NotAnObject,

    /// The `type` discriminator was missing or not a string.
    #[error("missing message kind")]
    MissingKind,

    /// A known kind arrived without its required `data` payload.
    #[error("missing payload for {0} message")]
    MissingPayload(&'static str),

    /// Messages of unknown kind are never constructed locally.
    #[error("cannot encode message of unknown kind {0:?}")]
    UnknownKind(String),
}

/// Encode a wire message to an immutable byte buffer.
pub fn encode(message: &WireMessage) -> Result<Bytes, CodecError> {
    let mut object = Map::new();
    object.insert("type".to_string(), Value::String(message.kind().to_string()));

    match message {
        WireMessage::State(snapshot) => {
            object.insert("data".to_string(), serde_json::to_value(snapshot)?);
        }
        WireMessage::Transaction(record) => {
            object.insert("data".to_string(), serde_json::to_value(record)?);
        }
        WireMessage::StateRequest => {}
        WireMessage::Unknown { kind } => {
            return Err(CodecError::UnknownKind(kind.clone()));
        }
    }

    Ok(Bytes::from(serde_json::to_vec(&Value::Object(object))?))
}

/// Decode a byte buffer into a wire message.
///
/// An unrecognized `type` is logged and returned as [`WireMessage::Unknown`];
/// every structural failure is a [`CodecError`]. Never panics on arbitrary
/// input.
pub fn decode(bytes: &[u8]) -> Result<WireMessage, CodecError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let object = value.as_object().ok_or(CodecError::NotAnObject)?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingKind)?;

    match kind {
        KIND_STATE => {
            let data = object
                .get("data")
                .cloned()
                .ok_or(CodecError::MissingPayload(KIND_STATE))?;
            Ok(WireMessage::State(serde_json::from_value(data)?))
        }
        KIND_TRANSACTION => {
            let data = object
                .get("data")
                .cloned()
                .ok_or(CodecError::MissingPayload(KIND_TRANSACTION))?;
            Ok(WireMessage::Transaction(serde_json::from_value(data)?))
        }
        KIND_STATE_REQUEST => Ok(WireMessage::StateRequest),
        other => {
            warn!(kind = other, "received message of unknown kind");
            Ok(WireMessage::Unknown {
                kind: other.to_string(),
            })
        }
    }
}
