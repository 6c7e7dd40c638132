//! End-to-end synchronization tests over the in-memory swarm.
//!
//! Each test stands up real nodes (mock backend, real codec, real sessions)
//! and drives them through connect, push, broadcast, and disconnect paths.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use walletmesh::{Amount, MockWallet, Node, NodeConfig};
use walletmesh_sync::{decode, encode, PeerId, PeerLink, SwarmEvent, WireMessage};
use walletmesh_sync::{MemoryEndpoint, MemorySwarm, SwarmTransport};

fn test_node(wallet_name: &str) -> Node<MockWallet> {
    let config = NodeConfig::new(wallet_name, 2, 0.5).unwrap();
    Node::new(MockWallet::new(), config)
}

/// Poll a condition until it holds or a wall-clock timeout expires.
async fn wait_until<F: Fn() -> bool>(what: &str, condition: F) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
}

/// Join the swarm as a bare peer and take the link to the first node that
/// connects to us. Lets a test speak raw frames without a second node.
async fn bare_peer(swarm: &Arc<MemorySwarm>) -> (MemoryEndpoint, Arc<dyn PeerLink>) {
    let endpoint = swarm.join(PeerId::random()).await;
    match endpoint.next_event().await.unwrap() {
        Some(SwarmEvent::Connected(link)) => (endpoint, link),
        _ => panic!("expected a connection on join"),
    }
}

#[tokio::test]
async fn test_late_joiner_converges_to_pushed_state() {
    let swarm = MemorySwarm::new(Node::<MockWallet>::topic());

    let alice = test_node("alice");
    let endpoint = swarm.join(alice.peer_id()).await;
    alice.start_sync(endpoint);

    // Alice does her funding and spending alone in the swarm.
    let report = alice.run_workflow().await.unwrap();
    assert_eq!(report.broadcast_peers, 0);
    assert_eq!(alice.view().balance(), Amount::new(100.0).unwrap());

    // Bob joins afterwards; session activation pushes Alice's state to him.
    let bob = test_node("bob");
    let endpoint = swarm.join(bob.peer_id()).await;
    bob.start_sync(endpoint);

    wait_until("bob to adopt alice's state", || {
        bob.view().balance() == Amount::new(100.0).unwrap() && bob.view().history_len() == 1
    })
    .await;

    let history = bob.view().snapshot().transactions;
    assert_eq!(history[0].tx_id, report.sent.tx_id);
    assert_eq!(history[0].sender, "alice");
}

#[tokio::test]
async fn test_broadcast_reaches_established_peer() {
    let swarm = MemorySwarm::new(Node::<MockWallet>::topic());

    let alice = test_node("alice");
    let bob = test_node("bob");
    let endpoint = swarm.join(alice.peer_id()).await;
    alice.start_sync(endpoint);
    let endpoint = swarm.join(bob.peer_id()).await;
    bob.start_sync(endpoint);

    wait_until("sessions to establish", || {
        alice.synchronizer().active_peers().len() == 1
            && bob.synchronizer().active_peers().len() == 1
    })
    .await;

    let report = alice.run_workflow().await.unwrap();
    assert_eq!(report.broadcast_peers, 1);

    // The transaction fans out; the balance does not (no push after
    // activation unless requested).
    wait_until("bob to receive the broadcast", || {
        bob.view().history_len() == 1
    })
    .await;
    assert_eq!(bob.view().balance(), Amount::ZERO);
}

#[tokio::test]
async fn test_state_request_pulls_fresh_snapshot() {
    let swarm = MemorySwarm::new(Node::<MockWallet>::topic());

    let alice = test_node("alice");
    let endpoint = swarm.join(alice.peer_id()).await;
    alice.start_sync(endpoint);

    let (_endpoint, link) = bare_peer(&swarm).await;

    // Activation push carries the pre-workflow (empty) state.
    let frame = link.recv().await.unwrap().unwrap();
    match decode(&frame).unwrap() {
        WireMessage::State(snapshot) => assert_eq!(snapshot.balance, Amount::ZERO),
        other => panic!("expected state push, got {:?}", other.kind()),
    }

    alice.run_workflow().await.unwrap();

    // The workflow's broadcast arrives next.
    let frame = link.recv().await.unwrap().unwrap();
    assert!(matches!(
        decode(&frame).unwrap(),
        WireMessage::Transaction(_)
    ));

    // An explicit request gets the current snapshot, not the stale one.
    link.send(encode(&WireMessage::StateRequest).unwrap())
        .await
        .unwrap();
    let frame = link.recv().await.unwrap().unwrap();
    match decode(&frame).unwrap() {
        WireMessage::State(snapshot) => {
            assert_eq!(snapshot.balance, Amount::new(100.0).unwrap());
            assert_eq!(snapshot.transactions.len(), 1);
        }
        other => panic!("expected state push, got {:?}", other.kind()),
    }
}

#[tokio::test]
async fn test_malformed_flood_disconnects_only_that_peer() {
    let swarm = MemorySwarm::new(Node::<MockWallet>::topic());

    let alice = test_node("alice");
    let endpoint = swarm.join(alice.peer_id()).await;
    alice.start_sync(endpoint);

    let (_endpoint, link) = bare_peer(&swarm).await;
    wait_until("session to register", || {
        alice.synchronizer().active_peers().len() == 1
    })
    .await;

    // Three malformed frames are tolerated; the fourth closes the link.
    for _ in 0..4 {
        link.send(Bytes::from_static(b"not json")).await.unwrap();
    }

    wait_until("session to deregister", || {
        alice.synchronizer().active_peers().is_empty()
    })
    .await;

    // Drain the activation push, then see the close. No diagnostic frame.
    let first = link.recv().await.unwrap().unwrap();
    assert!(matches!(decode(&first).unwrap(), WireMessage::State(_)));
    assert!(link.recv().await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_kinds_and_tolerated_garbage_keep_session_alive() {
    let swarm = MemorySwarm::new(Node::<MockWallet>::topic());

    let alice = test_node("alice");
    let endpoint = swarm.join(alice.peer_id()).await;
    alice.start_sync(endpoint);

    let (_endpoint, link) = bare_peer(&swarm).await;
    wait_until("session to register", || {
        alice.synchronizer().active_peers().len() == 1
    })
    .await;

    // Unknown kinds decode fine and never count against the threshold.
    link.send(Bytes::from_static(br#"{"type":"gossip","data":{}}"#))
        .await
        .unwrap();
    // Exactly at the threshold, not over it.
    for _ in 0..3 {
        link.send(Bytes::from_static(b"garbage")).await.unwrap();
    }

    // A valid frame after all that still dispatches.
    let record = walletmesh::TransactionRecord {
        sender: "mallory".to_string(),
        recipient: "addr".to_string(),
        amount: Amount::new(0.1).unwrap(),
        tx_id: walletmesh::TxId::new("t-after-garbage"),
    };
    link.send(encode(&WireMessage::Transaction(record)).unwrap())
        .await
        .unwrap();

    wait_until("the valid frame to dispatch", || {
        alice.view().history_len() == 1
    })
    .await;
    assert_eq!(alice.synchronizer().active_peers().len(), 1);
}

#[tokio::test]
async fn test_three_nodes_converge_on_largest_balance() {
    let swarm = MemorySwarm::new(Node::<MockWallet>::topic());

    // Carol funds more than the default, so her balance must win everywhere.
    let nodes = vec![
        ("alice", 1),
        ("bob", 2),
        ("carol", 3),
    ]
    .into_iter()
    .map(|(name, blocks)| {
        let config = NodeConfig::new(name, blocks, 0.5).unwrap();
        Node::new(MockWallet::new(), config)
    })
    .collect::<Vec<_>>();

    // Each node runs its workflow in isolation, then joins the mesh.
    for node in &nodes {
        node.run_workflow().await.unwrap();
    }
    for node in &nodes {
        let endpoint = swarm.join(node.peer_id()).await;
        node.start_sync(endpoint);
    }

    let winner = Amount::new(150.0).unwrap();
    wait_until("every node to adopt the largest balance", || {
        nodes.iter().all(|node| node.view().balance() == winner)
    })
    .await;
}

#[tokio::test]
async fn test_node_accepts_all_golden_wire_frames() {
    let swarm = MemorySwarm::new(Node::<MockWallet>::topic());

    let alice = test_node("alice");
    let endpoint = swarm.join(alice.peer_id()).await;
    alice.start_sync(endpoint);

    let (_endpoint, link) = bare_peer(&swarm).await;
    wait_until("session to register", || {
        alice.synchronizer().active_peers().len() == 1
    })
    .await;

    // Frames exactly as deployed peers emit them. None may trip the
    // malformed counter, whatever their kind.
    for vector in walletmesh_testkit::all_vectors() {
        link.send(Bytes::from(vector.json.as_bytes().to_vec()))
            .await
            .unwrap();
    }

    // The two state vectors carry 0.5 and 0; the transaction vector appends.
    wait_until("golden frames to dispatch", || {
        alice.view().balance() == Amount::new(0.5).unwrap() && alice.view().history_len() >= 2
    })
    .await;
    assert_eq!(alice.synchronizer().active_peers().len(), 1);
}

#[tokio::test]
async fn test_swarm_shutdown_ends_sync_task() {
    let swarm = MemorySwarm::new(Node::<MockWallet>::topic());

    let alice = test_node("alice");
    let endpoint = swarm.join(alice.peer_id()).await;
    let handle = alice.start_sync(endpoint);

    swarm.shutdown().await;
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("sync task should end after shutdown")
        .unwrap();
    assert!(result.is_ok());
}
