//! Direct messaging effect trait.
//!
//! The network layer exposes the local identity and a direct send to one
//! peer. Key material stays opaque: the liveness core addresses probes with
//! credential handles, the transport does the actual signing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::identifiers::PeerId;

/// Opaque public key handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    /// Wrap encoded key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the encoded key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Opaque key pair handle; only the public half is readable here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    public: PublicKey,
}

impl KeyPair {
    /// Wrap a public key handle.
    pub fn new(public: PublicKey) -> Self {
        Self { public }
    }

    /// The public half.
    pub fn public(&self) -> &PublicKey {
        &self.public
    }
}

/// A peer's reply to a direct message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectReply {
    /// Opaque reply content; liveness probes expect their nonce echoed here.
    pub content: Vec<u8>,
}

impl DirectReply {
    /// Create a reply envelope.
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }
}

/// Network operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NetworkError {
    /// The message could not be handed to the peer at all.
    #[error("Failed to send to {peer}: {reason}")]
    SendFailed {
        /// The peer the send targeted.
        peer: PeerId,
        /// Why the send failed.
        reason: String,
    },
    /// The transport is shut down or unconfigured.
    #[error("Transport unavailable: {reason}")]
    Unavailable {
        /// Why the transport is unavailable.
        reason: String,
    },
}

impl NetworkError {
    /// Create a send failure.
    pub fn send_failed(peer: PeerId, reason: impl Into<String>) -> Self {
        Self::SendFailed {
            peer,
            reason: reason.into(),
        }
    }

    /// Create an unavailability error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Direct messaging operations consumed by the liveness core.
#[async_trait]
pub trait NetworkEffects: Send + Sync {
    /// The local peer identity.
    fn peer_address(&self) -> PeerId;

    /// Human-readable node label, for logs only.
    fn node_label(&self) -> String;

    /// The local credential handles used to sign outgoing probes.
    fn key_pair(&self) -> KeyPair;

    /// Send an encoded message directly to one peer and await its reply.
    ///
    /// `sender_key` is the *local* identity's public key, under which the
    /// transport signs the outgoing message; it is not the recipient's key.
    ///
    /// An `Err` is the send-level failure signal, raised before any reply
    /// could arrive. A peer that accepts the message but never answers
    /// leaves the future pending; callers bound the wait with their own
    /// deadline.
    async fn send_direct(
        &self,
        recipient: PeerId,
        payload: Vec<u8>,
        sender_key: &PublicKey,
    ) -> Result<DirectReply, NetworkError>;
}

#[async_trait]
impl<T: NetworkEffects + ?Sized> NetworkEffects for Arc<T> {
    fn peer_address(&self) -> PeerId {
        (**self).peer_address()
    }

    fn node_label(&self) -> String {
        (**self).node_label()
    }

    fn key_pair(&self) -> KeyPair {
        (**self).key_pair()
    }

    async fn send_direct(
        &self,
        recipient: PeerId,
        payload: Vec<u8>,
        sender_key: &PublicKey,
    ) -> Result<DirectReply, NetworkError> {
        (**self).send_direct(recipient, payload, sender_key).await
    }
}
