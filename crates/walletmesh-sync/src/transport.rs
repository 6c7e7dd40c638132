//! Transport abstraction for the swarm.
//!
//! The transport is an external collaborator: it discovers peers sharing a
//! topic and yields authenticated, ordered, reliable byte-stream links to
//! them. Implementations may sit on any overlay; the `memory` module provides
//! an in-process swarm for tests.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::SyncError;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// A 32-byte rendezvous topic.
///
/// Derived by a fixed one-way hash of a constant application string, so every
/// instance of the application lands in the same swarm.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Topic(pub [u8; 32]);

impl Topic {
    /// Derive the topic for an application string.
    pub fn derive(app: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"walletmesh-topic-v0:");
        hasher.update(app.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({})", &self.to_hex()[..16])
    }
}

/// Unique identifier for a peer in the swarm.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub [u8; 32]);

impl PeerId {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate a random peer ID.
    pub fn random() -> Self {
        use rand::Rng;
        Self(rand::thread_rng().gen())
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// One duplex byte-stream connection to a peer.
///
/// The underlying transport guarantees ordering and whole-message delivery
/// per frame; the codec adds no framing of its own.
#[async_trait]
pub trait PeerLink: Send + Sync {
    /// The remote peer's identity.
    fn peer_id(&self) -> PeerId;

    /// Write one frame to the peer.
    async fn send(&self, frame: Bytes) -> Result<()>;

    /// Read the next frame from the peer.
    ///
    /// Returns `None` once the link is closed from either side.
    async fn recv(&self) -> Result<Option<Bytes>>;

    /// Forcibly close the link. No diagnostic is sent to the peer.
    async fn close(&self);
}

/// Events emitted by a joined swarm.
pub enum SwarmEvent {
    /// A new peer connection was established.
    Connected(Arc<dyn PeerLink>),
    /// A swarm-level fault. Logged by the synchronizer, non-fatal to
    /// established connections.
    Fault(String),
}

/// A joined swarm: a source of peer connections under one topic.
#[async_trait]
pub trait SwarmTransport: Send + Sync {
    /// The local node's identity in the swarm.
    fn local_peer_id(&self) -> PeerId;

    /// Wait for the next swarm event.
    ///
    /// Returns `None` when the swarm has been shut down.
    async fn next_event(&self) -> Result<Option<SwarmEvent>>;
}

/// A simple in-memory swarm for testing.
///
/// Joining wires a full mesh: every existing member receives a `Connected`
/// event for the newcomer and vice versa, over paired tokio channels.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::{mpsc, Mutex};

    /// Shared state for an in-memory swarm.
    pub struct MemorySwarm {
        topic: Topic,
        members: Mutex<HashMap<PeerId, mpsc::Sender<SwarmEvent>>>,
    }

    impl MemorySwarm {
        /// Create a new swarm for the given topic.
        pub fn new(topic: Topic) -> Arc<Self> {
            Arc::new(Self {
                topic,
                members: Mutex::new(HashMap::new()),
            })
        }

        /// The swarm's topic.
        pub fn topic(&self) -> Topic {
            self.topic
        }

        /// Join the swarm, connecting to all current members.
        pub async fn join(self: &Arc<Self>, peer_id: PeerId) -> MemoryEndpoint {
            let (event_tx, event_rx) = mpsc::channel(64);

            let mut members = self.members.lock().await;
            for (&existing_id, existing_events) in members.iter() {
                let (for_new, for_existing) = MemoryLink::pair(peer_id, existing_id);
                let _ = event_tx
                    .send(SwarmEvent::Connected(Arc::new(for_new)))
                    .await;
                let _ = existing_events
                    .send(SwarmEvent::Connected(Arc::new(for_existing)))
                    .await;
            }
            members.insert(peer_id, event_tx);

            MemoryEndpoint {
                peer_id,
                events: Mutex::new(event_rx),
            }
        }

        /// Shut the swarm down: endpoints see end-of-events.
        pub async fn shutdown(&self) {
            self.members.lock().await.clear();
        }
    }

    /// A member's handle to the in-memory swarm.
    pub struct MemoryEndpoint {
        peer_id: PeerId,
        events: Mutex<mpsc::Receiver<SwarmEvent>>,
    }

    #[async_trait]
    impl SwarmTransport for MemoryEndpoint {
        fn local_peer_id(&self) -> PeerId {
            self.peer_id
        }

        async fn next_event(&self) -> Result<Option<SwarmEvent>> {
            Ok(self.events.lock().await.recv().await)
        }
    }

    /// One side of an in-memory duplex link.
    pub struct MemoryLink {
        remote: PeerId,
        tx: StdMutex<Option<mpsc::Sender<Bytes>>>,
        rx: Mutex<mpsc::Receiver<Bytes>>,
    }

    impl MemoryLink {
        /// Create a connected pair of links between peers `a` and `b`.
        ///
        /// The first link is held by `a` (its remote is `b`), the second by `b`.
        pub fn pair(a: PeerId, b: PeerId) -> (MemoryLink, MemoryLink) {
            let (tx_ab, rx_ab) = mpsc::channel(64);
            let (tx_ba, rx_ba) = mpsc::channel(64);
            let for_a = MemoryLink {
                remote: b,
                tx: StdMutex::new(Some(tx_ab)),
                rx: Mutex::new(rx_ba),
            };
            let for_b = MemoryLink {
                remote: a,
                tx: StdMutex::new(Some(tx_ba)),
                rx: Mutex::new(rx_ab),
            };
            (for_a, for_b)
        }
    }

    #[async_trait]
    impl PeerLink for MemoryLink {
        fn peer_id(&self) -> PeerId {
            self.remote
        }

        async fn send(&self, frame: Bytes) -> Result<()> {
            let sender = self.tx.lock().unwrap().clone();
            match sender {
                Some(tx) => tx
                    .send(frame)
                    .await
                    .map_err(|_| SyncError::Transport("peer disconnected".into())),
                None => Err(SyncError::Transport("link closed".into())),
            }
        }

        async fn recv(&self) -> Result<Option<Bytes>> {
            Ok(self.rx.lock().await.recv().await)
        }

        async fn close(&self) {
            self.tx.lock().unwrap().take();
            self.rx.lock().await.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{MemoryLink, MemorySwarm};
    use super::*;

    #[test]
    fn test_topic_derivation_is_fixed() {
        let a = Topic::derive("walletmesh");
        let b = Topic::derive("walletmesh");
        let c = Topic::derive("something-else");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_link_pair_send_recv() {
        let a = PeerId::from_bytes([0xAA; 32]);
        let b = PeerId::from_bytes([0xBB; 32]);
        let (for_a, for_b) = MemoryLink::pair(a, b);

        assert_eq!(for_a.peer_id(), b);
        assert_eq!(for_b.peer_id(), a);

        for_a.send(Bytes::from_static(b"hello")).await.unwrap();
        let frame = for_b.recv().await.unwrap().unwrap();
        assert_eq!(&frame[..], b"hello");
    }

    #[tokio::test]
    async fn test_closed_link_rejects_send() {
        let a = PeerId::from_bytes([0x01; 32]);
        let b = PeerId::from_bytes([0x02; 32]);
        let (for_a, for_b) = MemoryLink::pair(a, b);

        for_a.close().await;
        assert!(for_a.send(Bytes::from_static(b"x")).await.is_err());

        // Remote sees end-of-stream once the sender is gone.
        assert!(for_b.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_join_wires_full_mesh() {
        let swarm = MemorySwarm::new(Topic::derive("test"));

        let a = swarm.join(PeerId::from_bytes([0xAA; 32])).await;
        let b = swarm.join(PeerId::from_bytes([0xBB; 32])).await;

        // A sees B connect, B sees A connect.
        let event_a = a.next_event().await.unwrap().unwrap();
        let event_b = b.next_event().await.unwrap().unwrap();

        match (event_a, event_b) {
            (SwarmEvent::Connected(link_a), SwarmEvent::Connected(link_b)) => {
                assert_eq!(link_a.peer_id(), b.local_peer_id());
                assert_eq!(link_b.peer_id(), a.local_peer_id());
            }
            _ => panic!("expected Connected events"),
        }
    }

    #[tokio::test]
    async fn test_shutdown_ends_event_stream() {
        let swarm = MemorySwarm::new(Topic::derive("test"));
        let a = swarm.join(PeerId::random()).await;
        swarm.shutdown().await;
        assert!(a.next_event().await.unwrap().is_none());
    }
}
