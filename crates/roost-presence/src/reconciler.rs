//! The post-login locations reconciliation pass.

use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use roost_core::{ContactPeerMessage, Locations, NetworkEffects, PeerId};

use crate::config::PresenceConfig;
use crate::election;
use crate::evidence::EvidenceNonce;
use crate::hooks::{LatePeerHook, NullLatePeerHook};

/// Output of one liveness pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The rebuilt locations list: responsive peers plus self.
    pub locations: Locations,
    /// The elected master for the user's message queue.
    pub master: PeerId,
    /// Whether the local peer is the master.
    pub is_master: bool,
}

/// Shared probe bookkeeping, written to by probe tasks on transport
/// worker threads and read once by the finalizer.
struct ProbeLedger {
    expected: usize,
    evidence: BTreeMap<PeerId, EvidenceNonce>,
    responses: BTreeMap<PeerId, bool>,
    done: bool,
}

struct ProbeState {
    ledger: Mutex<ProbeLedger>,
    all_recorded: Notify,
}

impl ProbeState {
    fn new(expected: usize) -> Self {
        Self {
            ledger: Mutex::new(ProbeLedger {
                expected,
                evidence: BTreeMap::new(),
                responses: BTreeMap::new(),
                done: false,
            }),
            all_recorded: Notify::new(),
        }
    }
}

/// Record a probe outcome, or discard it if the view is already final.
fn record_outcome(state: &ProbeState, hook: &dyn LatePeerHook, peer: PeerId, alive: bool) {
    let mut ledger = state.ledger.lock();
    if ledger.done {
        drop(ledger);
        debug!(%peer, alive, "probe outcome after finalization discarded");
        if alive {
            hook.on_late_reply(peer);
        }
        return;
    }
    ledger.responses.insert(peer, alive);
    let complete = ledger.responses.len() >= ledger.expected;
    drop(ledger);
    if complete {
        state.all_recorded.notify_one();
    }
}

/// Check a reply against the peer's recorded evidence and record it.
///
/// A mismatched echo is ignored outright: the peer neither proves liveness
/// nor counts as dead yet, it simply runs out the clock.
fn handle_reply(state: &ProbeState, hook: &dyn LatePeerHook, peer: PeerId, content: &[u8]) {
    let matched = {
        let ledger = state.ledger.lock();
        ledger.evidence.get(&peer).map(|nonce| nonce.matches(content))
    };
    match matched {
        Some(true) => record_outcome(state, hook, peer, true),
        Some(false) => warn!(%peer, "probe reply did not echo its evidence; ignoring"),
        None => warn!(%peer, "reply from a peer that was never probed; ignoring"),
    }
}

/// Single-use driver for one liveness pass.
///
/// `run` consumes the instance, probes every previously-known endpoint of
/// the user except self, and finalizes exactly once: when every probe has
/// an outcome or when the contact deadline elapses, whichever is first.
pub struct LocationsReconciler<N> {
    network: Arc<N>,
    config: PresenceConfig,
    late_hook: Arc<dyn LatePeerHook>,
}

impl<N: NetworkEffects + 'static> LocationsReconciler<N> {
    /// Create a reconciler for one login.
    pub fn new(network: Arc<N>, config: PresenceConfig) -> Self {
        Self {
            network,
            config,
            late_hook: Arc::new(NullLatePeerHook),
        }
    }

    /// Install a hook for correct replies that arrive after finalization.
    pub fn with_late_hook(mut self, hook: Arc<dyn LatePeerHook>) -> Self {
        self.late_hook = hook;
        self
    }

    /// Probe the stored locations and emit the reconciled view.
    pub async fn run(self, input: Locations) -> Reconciled {
        let local = self.network.peer_address();
        let to_probe: BTreeSet<PeerId> = input.peers().filter(|peer| *peer != local).collect();

        let state = Arc::new(ProbeState::new(to_probe.len()));
        if to_probe.is_empty() {
            debug!(user_id = input.user_id(), "no peers to probe");
            return self.finalize(&input, local, &state);
        }

        debug!(
            user_id = input.user_id(),
            peers = to_probe.len(),
            "probing stored locations"
        );
        for peer in &to_probe {
            self.spawn_probe(*peer, Arc::clone(&state));
        }

        if tokio::time::timeout(self.config.contact_await, state.all_recorded.notified())
            .await
            .is_err()
        {
            debug!(
                user_id = input.user_id(),
                "contact deadline elapsed; finalizing with partial responses"
            );
        }

        self.finalize(&input, local, &state)
    }

    /// Issue one challenge probe; outcomes land in the shared ledger.
    fn spawn_probe(&self, peer: PeerId, state: Arc<ProbeState>) {
        let nonce = EvidenceNonce::generate();
        state.ledger.lock().evidence.insert(peer, nonce.clone());

        let payload = match ContactPeerMessage::new(peer, nonce.as_str()).to_bytes() {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%peer, %error, "probe encoding failed");
                record_outcome(&state, self.late_hook.as_ref(), peer, false);
                return;
            }
        };

        let network = Arc::clone(&self.network);
        let hook = Arc::clone(&self.late_hook);
        tokio::spawn(async move {
            let key_pair = network.key_pair();
            match network.send_direct(peer, payload, key_pair.public()).await {
                Ok(reply) => handle_reply(&state, hook.as_ref(), peer, &reply.content),
                Err(error) => {
                    debug!(%peer, %error, "probe send failed");
                    record_outcome(&state, hook.as_ref(), peer, false);
                }
            }
        });
    }

    /// Seal the ledger and rebuild the locations list.
    fn finalize(&self, input: &Locations, local: PeerId, state: &ProbeState) -> Reconciled {
        let (alive, expected) = {
            let mut ledger = state.ledger.lock();
            ledger.done = true;
            let alive: BTreeSet<PeerId> = ledger
                .responses
                .iter()
                .filter(|&(_, alive)| *alive)
                .map(|(peer, _)| *peer)
                .collect();
            (alive, ledger.expected)
        };

        let mut locations = Locations::new(input.user_id());
        locations.insert(local);
        for peer in &alive {
            locations.insert(*peer);
        }

        let election = election::elect(&alive, local);
        info!(
            user_id = input.user_id(),
            node = %self.network.node_label(),
            alive = alive.len(),
            dropped = expected - alive.len(),
            master = %election.master,
            is_master = election.is_master,
            "locations reconciled"
        );

        Reconciled {
            locations,
            master: election.master,
            is_master: election.is_master,
        }
    }
}
