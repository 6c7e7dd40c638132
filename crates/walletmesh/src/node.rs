//! The Node: wires the wallet backend, the shared view, and the synchronizer.
//!
//! Owns the workflow that exercises the whole system: ensure the wallet
//! exists, fund it, send a payment, broadcast it to the mesh, verify its
//! confirmation status, and fold the resulting balance back into the view.

use std::sync::Arc;

use tracing::info;

use walletmesh_backend::{
    create_or_load_wallet, with_retry, TransactionDetails, WalletBackend,
};
use walletmesh_core::{Amount, TransactionRecord};
use walletmesh_sync::{PeerId, SharedView, SwarmTransport, Synchronizer, Topic};

use crate::config::NodeConfig;
use crate::error::Result;

/// The application string every instance hashes into the rendezvous topic.
const APP_TOPIC: &str = "walletmesh/wallet-state/v0";

/// Result of one workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    /// The wallet the workflow ran against.
    pub wallet_name: String,
    /// Seed phrase, present only if the wallet was freshly created.
    pub seed: Option<String>,
    /// Balance after funding.
    pub funded_balance: Amount,
    /// The test payment that was sent and broadcast.
    pub sent: TransactionRecord,
    /// Peers the broadcast reached.
    pub broadcast_peers: usize,
    /// Confirmations observed for the sent transaction.
    pub confirmations: u32,
    /// Balance after the send, as rechecked from the backend.
    pub final_balance: Amount,
}

/// A wallet instance participating in the mesh.
pub struct Node<B> {
    backend: Arc<B>,
    config: NodeConfig,
    peer_id: PeerId,
    synchronizer: Synchronizer,
}

impl<B: WalletBackend + 'static> Node<B> {
    /// Create a node over a backend and validated configuration.
    pub fn new(backend: B, config: NodeConfig) -> Self {
        let view = SharedView::new(config.wallet_name.clone());
        Self {
            backend: Arc::new(backend),
            config,
            peer_id: PeerId::random(),
            synchronizer: Synchronizer::new(view),
        }
    }

    /// The rendezvous topic shared by every instance of the application.
    pub fn topic() -> Topic {
        Topic::derive(APP_TOPIC)
    }

    /// This node's swarm identity.
    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    /// The shared wallet view.
    pub fn view(&self) -> &SharedView {
        self.synchronizer.view()
    }

    /// The synchronizer handle.
    pub fn synchronizer(&self) -> &Synchronizer {
        &self.synchronizer
    }

    /// Drive the synchronizer on a spawned task until the swarm shuts down.
    pub fn start_sync<T: SwarmTransport + 'static>(
        &self,
        transport: T,
    ) -> tokio::task::JoinHandle<walletmesh_sync::Result<()>> {
        let synchronizer = self.synchronizer.clone();
        tokio::spawn(async move { synchronizer.run(transport).await })
    }

    /// Run the local workflow once: fund, send, broadcast, verify, recheck.
    ///
    /// Backend reads go through the retry policy; the payment itself is
    /// sent at most once. A fatal error propagates and halts this run
    /// without touching the peer sessions.
    pub async fn run_workflow(&self) -> Result<WorkflowReport> {
        let wallet = &self.config.wallet_name;
        let retry = &self.config.retry;
        let backend = &*self.backend;

        let handle = with_retry(retry, "create_or_load_wallet", || {
            create_or_load_wallet(backend, wallet)
        })
        .await?;
        info!(%wallet, created = handle.seed.is_some(), "wallet ready");

        with_retry(retry, "fund_with_blocks", || {
            backend.fund_with_blocks(wallet, self.config.funding_blocks)
        })
        .await?;
        info!(%wallet, blocks = self.config.funding_blocks, "wallet funded");

        let funded_balance = with_retry(retry, "balance", || backend.balance(wallet)).await?;
        self.view().observe_balance(funded_balance);
        info!(%wallet, balance = %funded_balance, "balance observed");

        let address = backend.new_address(wallet).await?;
        let tx_id = backend
            .send_payment(wallet, &address, self.config.send_amount)
            .await?;
        let sent = TransactionRecord {
            sender: wallet.clone(),
            recipient: address.to_string(),
            amount: self.config.send_amount,
            tx_id,
        };
        info!(%wallet, tx_id = %sent.tx_id, amount = %sent.amount, "payment sent");

        self.view().record_transaction(sent.clone());
        let broadcast_peers = self.synchronizer.broadcast_transaction(&sent).await?;

        let TransactionDetails { confirmations, .. } =
            with_retry(retry, "transaction_status", || {
                backend.transaction_status(&sent.tx_id)
            })
            .await?;
        info!(%wallet, tx_id = %sent.tx_id, confirmations, "payment verified");

        let final_balance = with_retry(retry, "balance", || backend.balance(wallet)).await?;
        self.view().observe_balance(final_balance);

        Ok(WorkflowReport {
            wallet_name: wallet.clone(),
            seed: handle.seed,
            funded_balance,
            sent,
            broadcast_peers,
            confirmations,
            final_balance,
        })
    }
}
