//! # Walletmesh Sync
//!
//! Peer-to-peer synchronization of wallet state between independent wallet
//! instances sharing a swarm topic.
//!
//! ## Overview
//!
//! Each discovered peer connection gets a [`PeerSession`]. On activation a
//! session pushes the local wallet state; thereafter it decodes inbound
//! frames and dispatches them against the shared [`SharedView`]. The
//! [`Synchronizer`] owns the active-session set and fans locally originated
//! transactions out to every live peer, best-effort.
//!
//! ## Key Properties
//!
//! - **Largest-balance-wins**: a remote state replaces the local balance only
//!   when strictly greater; otherwise the message is a no-op.
//! - **At-most-once broadcast**: per-connection send failures are logged and
//!   skipped, never retried.
//! - **Malformed tolerance**: a session tolerates up to 3 malformed frames,
//!   then unilaterally closes the connection.
//!
//! ## Message Flow
//!
//! ```text
//! Wallet A                            Wallet B
//!   |-------- state ------------------->|   (on connect, both directions)
//!   |<------- state --------------------|
//!   |<------- state-request ------------|
//!   |-------- state ------------------->|   (fresh snapshot)
//!   |-------- transaction ------------->|   (broadcast fan-out)
//! ```

pub mod codec;
pub mod error;
pub mod messages;
pub mod reconcile;
pub mod session;
pub mod synchronizer;
pub mod transport;

pub use codec::{decode, encode, CodecError};
pub use error::{Result, SyncError};
pub use messages::WireMessage;
pub use reconcile::SharedView;
pub use session::{PeerSession, SessionState, SessionStatus, MAX_MALFORMED};
pub use synchronizer::Synchronizer;
pub use transport::{
    memory::MemoryEndpoint, memory::MemorySwarm, PeerId, PeerLink, SwarmEvent, SwarmTransport,
    Topic,
};
