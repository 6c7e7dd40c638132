//! Node configuration.
//!
//! Environment-supplied parameters for the workflow entry points. These
//! carry no protocol semantics; invalid values are fatal before any
//! networking starts.

use thiserror::Error;

use walletmesh_backend::RetryPolicy;
use walletmesh_core::Amount;

/// Environment variable naming the wallet.
pub const ENV_WALLET: &str = "WALLETMESH_WALLET";
/// Environment variable for the initial funding block count.
pub const ENV_FUNDING_BLOCKS: &str = "WALLETMESH_FUNDING_BLOCKS";
/// Environment variable for the initial test-send amount.
pub const ENV_SEND_AMOUNT: &str = "WALLETMESH_SEND_AMOUNT";

const DEFAULT_WALLET: &str = "walletmesh";
const DEFAULT_FUNDING_BLOCKS: u32 = 101;
const DEFAULT_SEND_AMOUNT: f64 = 0.1;

/// Configuration errors. All are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("wallet name must not be empty")]
    EmptyWalletName,

    #[error("send amount must be positive, got {0}")]
    NonPositiveSendAmount(f64),

    #[error("invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },
}

/// Parameters for one node's workflow.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Name of the wallet this node owns.
    pub wallet_name: String,
    /// Blocks to mine/credit on startup.
    pub funding_blocks: u32,
    /// Amount of the initial test send.
    pub send_amount: Amount,
    /// Backoff policy for backend RPC calls.
    pub retry: RetryPolicy,
}

impl NodeConfig {
    /// Create a validated configuration.
    pub fn new(
        wallet_name: impl Into<String>,
        funding_blocks: u32,
        send_amount: f64,
    ) -> Result<Self, ConfigError> {
        let wallet_name = wallet_name.into();
        if wallet_name.trim().is_empty() {
            return Err(ConfigError::EmptyWalletName);
        }
        let send_amount = Amount::new(send_amount)
            .map_err(|_| ConfigError::NonPositiveSendAmount(send_amount))?;
        if !send_amount.is_positive() {
            return Err(ConfigError::NonPositiveSendAmount(send_amount.value()));
        }
        Ok(Self {
            wallet_name,
            funding_blocks,
            send_amount,
            retry: RetryPolicy::default(),
        })
    }

    /// Read configuration from the environment, with defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let wallet_name =
            std::env::var(ENV_WALLET).unwrap_or_else(|_| DEFAULT_WALLET.to_string());

        let funding_blocks = match std::env::var(ENV_FUNDING_BLOCKS) {
            Ok(value) => value.parse::<u32>().map_err(|_| ConfigError::InvalidVar {
                var: ENV_FUNDING_BLOCKS,
                value,
            })?,
            Err(_) => DEFAULT_FUNDING_BLOCKS,
        };

        let send_amount = match std::env::var(ENV_SEND_AMOUNT) {
            Ok(value) => value.parse::<f64>().map_err(|_| ConfigError::InvalidVar {
                var: ENV_SEND_AMOUNT,
                value,
            })?,
            Err(_) => DEFAULT_SEND_AMOUNT,
        };

        Self::new(wallet_name, funding_blocks, send_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = NodeConfig::new("alice", 101, 0.1).unwrap();
        assert_eq!(config.wallet_name, "alice");
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn test_empty_wallet_name_is_fatal() {
        assert!(matches!(
            NodeConfig::new("", 101, 0.1),
            Err(ConfigError::EmptyWalletName)
        ));
        assert!(matches!(
            NodeConfig::new("   ", 101, 0.1),
            Err(ConfigError::EmptyWalletName)
        ));
    }

    #[test]
    fn test_non_positive_send_amount_is_fatal() {
        assert!(matches!(
            NodeConfig::new("alice", 101, 0.0),
            Err(ConfigError::NonPositiveSendAmount(_))
        ));
        assert!(matches!(
            NodeConfig::new("alice", 101, -1.0),
            Err(ConfigError::NonPositiveSendAmount(_))
        ));
    }
}
