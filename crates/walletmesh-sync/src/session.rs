//! Peer session: one connection's conversation.
//!
//! State machine: `Opening -> Active -> Closed`. Activation pushes the local
//! state once; every inbound frame is decoded and dispatched against the
//! shared view. Malformed frames are tolerated up to a threshold, after
//! which the connection is forcibly terminated - a unilateral local
//! decision, with no diagnostic sent to the peer.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::codec;
use crate::error::Result;
use crate::messages::WireMessage;
use crate::reconcile::SharedView;
use crate::transport::PeerLink;

/// Number of malformed frames a session tolerates before closing.
pub const MAX_MALFORMED: u32 = 3;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, state push not yet sent.
    Opening,
    /// State pushed; dispatching inbound messages.
    Active,
    /// Terminal. No further dispatch occurs.
    Closed,
}

/// What the caller should do after a frame was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Keep reading frames.
    Continue,
    /// The session closed; stop reading and deregister.
    Closed,
}

/// Manages exactly one peer connection's conversation.
pub struct PeerSession {
    link: Arc<dyn PeerLink>,
    view: SharedView,
    state: SessionState,
    malformed: u32,
}

impl PeerSession {
    /// Create a session over an established link.
    pub fn new(link: Arc<dyn PeerLink>, view: SharedView) -> Self {
        Self {
            link,
            view,
            state: SessionState::Opening,
            malformed: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Session-scoped malformed frame count. Reset only by recreation.
    pub fn malformed_count(&self) -> u32 {
        self.malformed
    }

    /// Enter `Active`: push a state message built from the current view
    /// snapshot. No acknowledgment is awaited.
    pub async fn activate(&mut self) -> Result<()> {
        self.push_state().await?;
        self.state = SessionState::Active;
        debug!(peer = %self.link.peer_id(), "session active");
        Ok(())
    }

    /// Handle one inbound frame.
    ///
    /// Dispatch never blocks on reconciliation: view mutation is a
    /// synchronous critical section.
    pub async fn handle_frame(&mut self, frame: &[u8]) -> Result<SessionStatus> {
        if self.state == SessionState::Closed {
            return Ok(SessionStatus::Closed);
        }

        match codec::decode(frame) {
            Ok(WireMessage::State(snapshot)) => {
                self.view.apply_remote_state(&snapshot);
            }
            Ok(WireMessage::Transaction(record)) => {
                self.view.record_transaction(record);
            }
            Ok(WireMessage::StateRequest) => {
                // Always a fresh snapshot, never cached.
                self.push_state().await?;
            }
            Ok(WireMessage::Unknown { kind }) => {
                debug!(peer = %self.link.peer_id(), kind, "dropping message of unknown kind");
            }
            Err(error) => {
                self.malformed += 1;
                warn!(
                    peer = %self.link.peer_id(),
                    count = self.malformed,
                    %error,
                    "malformed message from peer"
                );
                if self.malformed > MAX_MALFORMED {
                    warn!(
                        peer = %self.link.peer_id(),
                        "closing connection after repeated malformed messages"
                    );
                    self.link.close().await;
                    self.state = SessionState::Closed;
                    return Ok(SessionStatus::Closed);
                }
            }
        }

        Ok(SessionStatus::Continue)
    }

    /// Drive the session to completion: activate, then dispatch frames
    /// until the link closes or the malformed threshold is exceeded.
    pub async fn run(mut self) {
        let peer = self.link.peer_id();
        if let Err(error) = self.activate().await {
            warn!(%peer, %error, "failed to push initial state");
            return;
        }

        loop {
            match self.link.recv().await {
                Ok(Some(frame)) => match self.handle_frame(&frame).await {
                    Ok(SessionStatus::Continue) => {}
                    Ok(SessionStatus::Closed) => break,
                    Err(error) => {
                        warn!(%peer, %error, "session error");
                        break;
                    }
                },
                Ok(None) => {
                    debug!(%peer, "peer closed connection");
                    break;
                }
                Err(error) => {
                    warn!(%peer, %error, "connection error");
                    break;
                }
            }
        }
    }

    async fn push_state(&self) -> Result<()> {
        let frame = codec::encode(&WireMessage::State(self.view.snapshot()))?;
        self.link.send(frame).await
    }
}
