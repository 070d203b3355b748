//! Evidence nonces for liveness probes.

use uuid::Uuid;

/// Single-use random challenge carried by one liveness probe.
///
/// A peer proves it is alive by echoing the nonce byte-exact; anything else
/// is treated as a failed probe, never as a protocol error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceNonce(String);

impl EvidenceNonce {
    /// Generate a fresh random nonce.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The nonce as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a reply's content echoes this nonce byte-exact.
    pub fn matches(&self, reply: &[u8]) -> bool {
        self.0.as_bytes() == reply
    }
}

impl std::fmt::Display for EvidenceNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_nonces_differ() {
        assert_ne!(EvidenceNonce::generate(), EvidenceNonce::generate());
    }

    #[test]
    fn matching_is_byte_exact() {
        let nonce = EvidenceNonce::generate();
        assert!(nonce.matches(nonce.as_str().as_bytes()));
        assert!(!nonce.matches(b"close-but-not-it"));

        let mut truncated = nonce.as_str().as_bytes().to_vec();
        truncated.pop();
        assert!(!nonce.matches(&truncated));
    }
}
