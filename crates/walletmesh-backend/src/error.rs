//! Backend error taxonomy.
//!
//! The backend distinguishes retryable from terminal failures only through
//! an error-code convention; callers branch on [`BackendError::code`].

use std::fmt;

use thiserror::Error;

/// Error codes the wallet backend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The wallet is already loaded (or already exists). Recovered by the
    /// load branch of `create_or_load_wallet`.
    AlreadyLoaded,
    /// The named wallet does not exist.
    WalletNotFound,
    /// The transaction is not (yet) known to the node. Retryable: a
    /// just-sent transaction may not be indexed.
    TransactionNotFound,
    /// The node is temporarily unreachable. Retryable.
    Unavailable,
    /// Not enough spendable funds for the payment.
    InsufficientFunds,
    /// The request itself was invalid.
    InvalidRequest,
    /// Any other backend failure. Terminal.
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::AlreadyLoaded => "already-loaded",
            ErrorCode::WalletNotFound => "wallet-not-found",
            ErrorCode::TransactionNotFound => "transaction-not-found",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::InsufficientFunds => "insufficient-funds",
            ErrorCode::InvalidRequest => "invalid-request",
            ErrorCode::Internal => "internal",
        };
        write!(f, "{name}")
    }
}

/// An error from the wallet backend, carrying its code convention.
#[derive(Debug, Clone, Error)]
#[error("{message} ({code})")]
pub struct BackendError {
    code: ErrorCode,
    message: String,
}

impl BackendError {
    /// Create an error with an explicit code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Node temporarily unreachable.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unavailable, message)
    }

    /// Wallet does not exist.
    pub fn wallet_not_found(name: &str) -> Self {
        Self::new(ErrorCode::WalletNotFound, format!("wallet {name:?} does not exist"))
    }

    /// Wallet already loaded.
    pub fn already_loaded(name: &str) -> Self {
        Self::new(ErrorCode::AlreadyLoaded, format!("wallet {name:?} is already loaded"))
    }

    /// Transaction unknown to the node.
    pub fn transaction_not_found(tx_id: &str) -> Self {
        Self::new(
            ErrorCode::TransactionNotFound,
            format!("transaction {tx_id} not found"),
        )
    }

    /// The error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Whether the retry/backoff policy applies to this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::Unavailable | ErrorCode::TransactionNotFound
        )
    }
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
