//! Synchronizer: top-level orchestration of peer sessions.
//!
//! The synchronizer is the only writer of "which peers exist". It registers
//! a session per transport connection, deregisters it when the session ends,
//! and fans locally originated transactions out to every live link.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::codec;
use crate::error::Result;
use crate::messages::WireMessage;
use crate::reconcile::SharedView;
use crate::session::PeerSession;
use crate::transport::{PeerId, PeerLink, SwarmEvent, SwarmTransport};

use walletmesh_core::TransactionRecord;

type SessionRegistry = Arc<Mutex<HashMap<PeerId, Arc<dyn PeerLink>>>>;

/// Orchestrates session creation and transaction fan-out.
#[derive(Clone)]
pub struct Synchronizer {
    view: SharedView,
    sessions: SessionRegistry,
}

impl Synchronizer {
    /// Create a synchronizer over the shared wallet view.
    pub fn new(view: SharedView) -> Self {
        Self {
            view,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The shared view this synchronizer reconciles into.
    pub fn view(&self) -> &SharedView {
        &self.view
    }

    /// Peers with a currently active session.
    pub fn active_peers(&self) -> Vec<PeerId> {
        self.sessions.lock().unwrap().keys().copied().collect()
    }

    /// Register a link and drive its session on a spawned task.
    ///
    /// The session deregisters itself when it ends, whichever side closed.
    pub fn spawn_session(&self, link: Arc<dyn PeerLink>) -> tokio::task::JoinHandle<()> {
        let peer = link.peer_id();
        info!(%peer, "peer connected");
        self.sessions.lock().unwrap().insert(peer, Arc::clone(&link));

        let session = PeerSession::new(link, self.view.clone());
        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            session.run().await;
            sessions.lock().unwrap().remove(&peer);
            info!(%peer, "peer session ended");
        })
    }

    /// Consume swarm events until the transport shuts down.
    ///
    /// Swarm-level faults are logged and do not tear down existing sessions.
    pub async fn run<T: SwarmTransport>(&self, transport: T) -> Result<()> {
        loop {
            match transport.next_event().await? {
                Some(SwarmEvent::Connected(link)) => {
                    self.spawn_session(link);
                }
                Some(SwarmEvent::Fault(message)) => {
                    warn!(%message, "swarm fault");
                }
                None => {
                    debug!("swarm shut down");
                    return Ok(());
                }
            }
        }
    }

    /// Fan a locally originated transaction out to every active session.
    ///
    /// The message is serialized once. A write failure on one connection is
    /// logged and skipped; delivery to the remaining peers proceeds. At
    /// most once, best effort: no retry, no acknowledgment. Returns the
    /// number of peers the write succeeded for.
    pub async fn broadcast_transaction(&self, record: &TransactionRecord) -> Result<usize> {
        let frame = codec::encode(&WireMessage::Transaction(record.clone()))?;

        let targets: Vec<(PeerId, Arc<dyn PeerLink>)> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .map(|(&peer, link)| (peer, Arc::clone(link)))
            .collect();

        let mut delivered = 0;
        for (peer, link) in targets {
            match link.send(frame.clone()).await {
                Ok(()) => delivered += 1,
                Err(error) => {
                    warn!(%peer, %error, tx_id = %record.tx_id, "broadcast delivery failed");
                }
            }
        }

        debug!(tx_id = %record.tx_id, delivered, "transaction broadcast complete");
        Ok(delivered)
    }
}
