//! Scripted direct-messaging layer.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use roost_core::{
    ContactPeerMessage, DirectReply, KeyPair, NetworkEffects, NetworkError, PeerId, PublicKey,
};

/// How a scripted peer reacts to a liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeBehavior {
    /// Echo the probe's nonce after the given delay.
    EchoNonce {
        /// Simulated round-trip time.
        delay: Duration,
    },
    /// Reply after the delay with content that is not the nonce.
    WrongNonce {
        /// Simulated round-trip time.
        delay: Duration,
    },
    /// Accept the send but never reply.
    Silent,
    /// Fail at the send level immediately.
    SendFailure,
}

/// Network handler with per-peer scripted probe behavior.
///
/// Peers without a scripted behavior stay silent, which models an endpoint
/// that went away without refusing connections.
pub struct ScriptedNetwork {
    local: PeerId,
    behaviors: Mutex<BTreeMap<PeerId, ProbeBehavior>>,
    sent: Mutex<Vec<(PeerId, ContactPeerMessage)>>,
}

impl ScriptedNetwork {
    /// Create a network whose local identity is `local`.
    pub fn new(local: PeerId) -> Self {
        Self {
            local,
            behaviors: Mutex::new(BTreeMap::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Script how a peer answers probes.
    pub fn script_peer(&self, peer: PeerId, behavior: ProbeBehavior) {
        self.behaviors.lock().insert(peer, behavior);
    }

    /// Every probe sent so far, in order.
    pub fn sent_probes(&self) -> Vec<(PeerId, ContactPeerMessage)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl NetworkEffects for ScriptedNetwork {
    fn peer_address(&self) -> PeerId {
        self.local
    }

    fn node_label(&self) -> String {
        format!("test-{}", self.local)
    }

    fn key_pair(&self) -> KeyPair {
        KeyPair::new(PublicKey::new(self.local.as_bytes().to_vec()))
    }

    async fn send_direct(
        &self,
        recipient: PeerId,
        payload: Vec<u8>,
        _sender_key: &PublicKey,
    ) -> Result<DirectReply, NetworkError> {
        let message = ContactPeerMessage::from_bytes(&payload)
            .map_err(|e| NetworkError::send_failed(recipient, e.to_string()))?;
        self.sent.lock().push((recipient, message.clone()));

        let behavior = self
            .behaviors
            .lock()
            .get(&recipient)
            .copied()
            .unwrap_or(ProbeBehavior::Silent);
        debug!(peer = %recipient, ?behavior, "scripted probe dispatched");

        match behavior {
            ProbeBehavior::EchoNonce { delay } => {
                tokio::time::sleep(delay).await;
                Ok(DirectReply::new(message.nonce.into_bytes()))
            }
            ProbeBehavior::WrongNonce { delay } => {
                tokio::time::sleep(delay).await;
                Ok(DirectReply::new(b"not-the-evidence".to_vec()))
            }
            ProbeBehavior::Silent => futures::future::pending().await,
            ProbeBehavior::SendFailure => {
                Err(NetworkError::send_failed(recipient, "connection refused"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn peer(seed: u8) -> PeerId {
        PeerId::new([seed; 32])
    }

    #[tokio::test(start_paused = true)]
    async fn echo_behavior_returns_the_nonce() {
        let network = ScriptedNetwork::new(peer(1));
        network.script_peer(
            peer(2),
            ProbeBehavior::EchoNonce {
                delay: Duration::from_millis(10),
            },
        );

        let message = ContactPeerMessage::new(peer(2), "nonce-123");
        let reply = network
            .send_direct(
                peer(2),
                message.to_bytes().expect("encode"),
                &PublicKey::new(vec![]),
            )
            .await
            .expect("reply");
        assert_eq!(reply.content, b"nonce-123");
        assert_eq!(network.sent_probes().len(), 1);
    }

    #[tokio::test]
    async fn send_failure_errors_immediately() {
        let network = ScriptedNetwork::new(peer(1));
        network.script_peer(peer(2), ProbeBehavior::SendFailure);

        let message = ContactPeerMessage::new(peer(2), "nonce");
        let result = network
            .send_direct(
                peer(2),
                message.to_bytes().expect("encode"),
                &PublicKey::new(vec![]),
            )
            .await;
        assert_matches!(result, Err(NetworkError::SendFailed { .. }));
    }
}
