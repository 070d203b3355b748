//! Direct message formats.
//!
//! Wire-level shapes exchanged over the direct-messaging layer. Encoding is
//! bincode; the payload handed to [`NetworkEffects::send_direct`] is the
//! encoded form.
//!
//! [`NetworkEffects::send_direct`]: crate::effects::network::NetworkEffects::send_direct

use serde::{Deserialize, Serialize};

use crate::errors::{Result, RoostError};
use crate::identifiers::PeerId;

/// Liveness probe sent to one previously-known client endpoint.
///
/// The receiver proves liveness by echoing the nonce, byte-exact, in its
/// reply content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPeerMessage {
    /// The peer this probe addresses.
    pub receiver: PeerId,
    /// Single-use random evidence string, uuid-shaped.
    pub nonce: String,
}

impl ContactPeerMessage {
    /// Create a probe for a peer.
    pub fn new(receiver: PeerId, nonce: impl Into<String>) -> Self {
        Self {
            receiver,
            nonce: nonce.into(),
        }
    }

    /// Encode for the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| RoostError::serialization(e.to_string()))
    }

    /// Decode from the wire.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| RoostError::serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_peer_round_trip() {
        let message = ContactPeerMessage::new(
            PeerId::new([9u8; 32]),
            "1f0e7c0a-8c61-4d5e-9f6a-3b2d1c0e9f8a",
        );
        let bytes = message.to_bytes().expect("encode");
        let decoded = ContactPeerMessage::from_bytes(&bytes).expect("decode");
        assert_eq!(message, decoded);
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(ContactPeerMessage::from_bytes(&[0xff, 0x01]).is_err());
    }
}
