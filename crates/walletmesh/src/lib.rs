//! # Walletmesh
//!
//! The unified API for walletmesh - peer-to-peer synchronization of wallet
//! state between independent wallet instances.
//!
//! ## Overview
//!
//! A walletmesh node:
//!
//! - drives a local wallet workflow (fund, send, verify) against an opaque
//!   [`WalletBackend`](walletmesh_backend::WalletBackend),
//! - joins a swarm under a fixed topic and pushes its wallet state to every
//!   discovered peer,
//! - reconciles incoming peer state with the largest-balance-wins rule, and
//! - fans locally originated transactions out to all live peers, best-effort.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use walletmesh::{Node, NodeConfig};
//! use walletmesh_backend::MockWallet;
//! use walletmesh_sync::MemorySwarm;
//!
//! async fn example() {
//!     let config = NodeConfig::new("alice", 101, 0.1).unwrap();
//!     let node = Node::new(MockWallet::new(), config);
//!
//!     let swarm = MemorySwarm::new(Node::<MockWallet>::topic());
//!     let endpoint = swarm.join(node.peer_id()).await;
//!     node.start_sync(endpoint);
//!
//!     let report = node.run_workflow().await.unwrap();
//!     println!("sent {} to {} peers", report.sent.tx_id, report.broadcast_peers);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `walletmesh::core` - Core primitives (WalletView, TransactionRecord, ...)
//! - `walletmesh::sync` - Codec, sessions, synchronizer, transport
//! - `walletmesh::backend` - WalletBackend seam, retry policy, mock

pub mod config;
pub mod error;
pub mod node;
pub mod telemetry;

// Re-export component crates
pub use walletmesh_backend as backend;
pub use walletmesh_core as core;
pub use walletmesh_sync as sync;

// Re-export main types for convenience
pub use config::{ConfigError, NodeConfig};
pub use error::{NodeError, Result};
pub use node::{Node, WorkflowReport};

// Re-export commonly used component types
pub use walletmesh_backend::{MockWallet, RetryPolicy, WalletBackend};
pub use walletmesh_core::{Amount, TransactionRecord, TxId, WalletSnapshot, WalletView};
pub use walletmesh_sync::{SharedView, Synchronizer, Topic};
