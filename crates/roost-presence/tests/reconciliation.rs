//! End-to-end liveness pass scenarios against a scripted network.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use roost_core::{Locations, PeerId};
use roost_presence::{LatePeerHook, LocationsReconciler, PresenceConfig, Reconciled};
use roost_testkit::{init_tracing, ProbeBehavior, ScriptedNetwork};

fn peer(seed: u8) -> PeerId {
    PeerId::new([seed; 32])
}

fn locations_of(user: &str, peers: &[PeerId]) -> Locations {
    let mut locations = Locations::new(user);
    for peer in peers {
        locations.insert(*peer);
    }
    locations
}

fn peers_of(result: &Reconciled) -> BTreeSet<PeerId> {
    result.locations.peer_set()
}

fn test_config() -> PresenceConfig {
    PresenceConfig {
        contact_await: Duration::from_millis(10_000),
    }
}

#[derive(Default)]
struct CountingHook {
    late: AtomicUsize,
}

impl LatePeerHook for CountingHook {
    fn on_late_reply(&self, _peer: PeerId) {
        self.late.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(start_paused = true)]
async fn solo_login_is_master_without_probes() {
    init_tracing();
    let network = Arc::new(ScriptedNetwork::new(peer(1)));
    let input = locations_of("alice", &[peer(1)]);

    let result = LocationsReconciler::new(Arc::clone(&network), test_config())
        .run(input)
        .await;

    assert_eq!(peers_of(&result), [peer(1)].into_iter().collect());
    assert!(result.is_master);
    assert_eq!(result.master, peer(1));
    assert!(network.sent_probes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn all_peers_alive_lowest_becomes_master() {
    init_tracing();
    // Local peer A sorts lowest.
    let network = Arc::new(ScriptedNetwork::new(peer(1)));
    for other in [peer(2), peer(3)] {
        network.script_peer(
            other,
            ProbeBehavior::EchoNonce {
                delay: Duration::from_millis(50),
            },
        );
    }
    let input = locations_of("alice", &[peer(1), peer(2), peer(3)]);

    let result = LocationsReconciler::new(Arc::clone(&network), test_config())
        .run(input)
        .await;

    assert_eq!(
        peers_of(&result),
        [peer(1), peer(2), peer(3)].into_iter().collect()
    );
    assert!(result.is_master);

    // Each probe carried its own fresh nonce.
    let probes = network.sent_probes();
    assert_eq!(probes.len(), 2);
    assert_ne!(probes[0].1.nonce, probes[1].1.nonce);
    for (recipient, message) in &probes {
        assert_eq!(message.receiver, *recipient);
    }
}

#[tokio::test(start_paused = true)]
async fn dead_peer_is_dropped_at_the_deadline() {
    init_tracing();
    // Local peer C sorts highest; A never answers, B echoes.
    let network = Arc::new(ScriptedNetwork::new(peer(3)));
    network.script_peer(peer(1), ProbeBehavior::Silent);
    network.script_peer(
        peer(2),
        ProbeBehavior::EchoNonce {
            delay: Duration::from_millis(50),
        },
    );
    let input = locations_of("bob", &[peer(1), peer(2), peer(3)]);

    let started = tokio::time::Instant::now();
    let result = LocationsReconciler::new(Arc::clone(&network), test_config())
        .run(input)
        .await;

    assert_eq!(started.elapsed(), Duration::from_millis(10_000));
    assert_eq!(peers_of(&result), [peer(2), peer(3)].into_iter().collect());
    assert!(!result.is_master);
    assert_eq!(result.master, peer(2));
}

#[tokio::test(start_paused = true)]
async fn mismatched_nonce_counts_as_dead() {
    init_tracing();
    let network = Arc::new(ScriptedNetwork::new(peer(1)));
    network.script_peer(
        peer(2),
        ProbeBehavior::WrongNonce {
            delay: Duration::from_millis(50),
        },
    );
    let input = locations_of("alice", &[peer(1), peer(2)]);

    let started = tokio::time::Instant::now();
    let result = LocationsReconciler::new(Arc::clone(&network), test_config())
        .run(input)
        .await;

    // A wrong echo is ignored rather than recorded, so the pass waits out
    // the full deadline before dropping the peer.
    assert_eq!(started.elapsed(), Duration::from_millis(10_000));
    assert_eq!(peers_of(&result), [peer(1)].into_iter().collect());
    assert!(result.is_master);
}

#[tokio::test(start_paused = true)]
async fn send_failures_finalize_before_the_deadline() {
    init_tracing();
    let network = Arc::new(ScriptedNetwork::new(peer(2)));
    network.script_peer(peer(1), ProbeBehavior::SendFailure);
    network.script_peer(peer(3), ProbeBehavior::SendFailure);
    let input = locations_of("carol", &[peer(1), peer(2), peer(3)]);

    let started = tokio::time::Instant::now();
    let result = LocationsReconciler::new(Arc::clone(&network), test_config())
        .run(input)
        .await;

    assert!(started.elapsed() < Duration::from_millis(10_000));
    assert_eq!(peers_of(&result), [peer(2)].into_iter().collect());
    assert!(result.is_master);
}

#[tokio::test(start_paused = true)]
async fn missing_self_is_added_back() {
    init_tracing();
    let network = Arc::new(ScriptedNetwork::new(peer(1)));
    network.script_peer(
        peer(2),
        ProbeBehavior::EchoNonce {
            delay: Duration::from_millis(10),
        },
    );
    // Stored list predates this endpoint, so it does not name us.
    let input = locations_of("alice", &[peer(2)]);

    let result = LocationsReconciler::new(Arc::clone(&network), test_config())
        .run(input)
        .await;

    assert_eq!(peers_of(&result), [peer(1), peer(2)].into_iter().collect());
    assert!(result.is_master);
}

#[tokio::test(start_paused = true)]
async fn late_reply_is_discarded_and_reported() {
    init_tracing();
    let network = Arc::new(ScriptedNetwork::new(peer(1)));
    network.script_peer(
        peer(2),
        ProbeBehavior::EchoNonce {
            delay: Duration::from_millis(20_000),
        },
    );
    let input = locations_of("alice", &[peer(1), peer(2)]);
    let hook = Arc::new(CountingHook::default());

    let result = LocationsReconciler::new(Arc::clone(&network), test_config())
        .with_late_hook(hook.clone())
        .run(input)
        .await;

    assert_eq!(peers_of(&result), [peer(1)].into_iter().collect());
    assert_eq!(hook.late.load(Ordering::SeqCst), 0);

    // Let the straggler's echo land well after finalization.
    tokio::time::sleep(Duration::from_millis(15_000)).await;
    assert_eq!(hook.late.load(Ordering::SeqCst), 1);
    // The emitted view is unaffected.
    assert_eq!(peers_of(&result), [peer(1)].into_iter().collect());
}
