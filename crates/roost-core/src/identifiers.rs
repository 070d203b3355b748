//! Identifier types for peers, content locations, and versions.
//!
//! Peers and versions are fixed-width 32-byte identifiers with a stable
//! total order; location and content keys are the application-level byte
//! strings the DHT hashes down to fixed-width routing identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque peer identifier with a stable total order.
///
/// The order is the transport's natural byte ordering and is stable for the
/// life of the process; master election relies on it being deterministic
/// across all participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(pub [u8; 32]);

impl PeerId {
    /// Create from a 32-byte array.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get as bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full hex is unwieldy in logs; eight leading chars identify a peer
        // unambiguously in any realistic test or deployment.
        write!(f, "peer-{}", &self.to_hex()[..8])
    }
}

impl From<[u8; 32]> for PeerId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Fixed-width identifier tagging one immutable revision of a content item.
///
/// Ordered by natural byte ordering. The zero value is the sentinel parent
/// of root revisions; the max value bounds digest range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionKey(pub [u8; 32]);

impl VersionKey {
    /// Create from a 32-byte array.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The zero sentinel used as the parent of root revisions.
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// The maximum key, used as the upper bound of digest ranges.
    pub fn max() -> Self {
        Self([0xffu8; 32])
    }

    /// Whether this is the root sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Get as bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for VersionKey {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v-{}", &self.to_hex()[..8])
    }
}

impl From<[u8; 32]> for VersionKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Application-level key naming a storage location in the DHT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationKey(String);

impl LocationKey {
    /// Create a new location key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the raw bytes the DHT hashes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LocationKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for LocationKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Application-level key naming one content item under a location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentKey(String);

impl ContentKey {
    /// Create a new content key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the raw bytes the DHT hashes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ContentKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}
