//! Strong type definitions for walletmesh.
//!
//! Identifiers and amounts are newtypes to prevent misuse at compile time.
//! Serde renames pin the camelCase field names used on the wire.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A non-negative decimal amount of coin.
///
/// The wire protocol carries amounts as JSON decimal numbers (e.g. `0.5`),
/// so this wraps an `f64`. Construction and deserialization both reject
/// negative and non-finite values; comparisons beyond that are taken at
/// face value, which is what the largest-balance-wins rule requires.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0.0);

    /// Create a validated amount.
    pub fn new(value: f64) -> Result<Self, CoreError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidAmount(value))
        }
    }

    /// Get the raw decimal value.
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Whether this amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A transaction identifier as reported by the wallet backend.
///
/// Assumed globally unique; never verified for uniqueness or double-counting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    /// Create from a backend-supplied string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TxId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A receiving address produced by the wallet backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create from a backend-supplied string.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Get the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One payment as it travels between peers.
///
/// Opaque beyond structural validity: no ledger validation, no ordering
/// requirement relative to other peers' transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Wallet name of the sending instance.
    pub sender: String,
    /// Destination address.
    pub recipient: String,
    /// Amount moved.
    pub amount: Amount,
    /// Backend-assigned transaction id.
    pub tx_id: TxId,
}
