//! Versioned content model and replica response types.
//!
//! A content item is a chain of immutable revisions: each revision names its
//! parent through `based_on`, roots use the zero sentinel. Replicas report
//! the outcome of a put per version key, and report their view of the
//! version history as an ordered key digest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::identifiers::{ContentKey, LocationKey, PeerId, VersionKey};

/// One immutable revision of a content item as it travels the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkContent {
    /// Identifier of this revision.
    pub version_key: VersionKey,
    /// Identifier of the parent revision; zero for roots.
    pub based_on: VersionKey,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
}

impl NetworkContent {
    /// Create a new revision.
    pub fn new(version_key: VersionKey, based_on: VersionKey, payload: Vec<u8>) -> Self {
        Self {
            version_key,
            based_on,
            payload,
        }
    }

    /// Create a root revision (zero parent).
    pub fn root(version_key: VersionKey, payload: Vec<u8>) -> Self {
        Self::new(version_key, VersionKey::zero(), payload)
    }

    /// Whether this revision is a root.
    pub fn is_root(&self) -> bool {
        self.based_on.is_zero()
    }
}

/// Reply code from a replica peer for one stored version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PutStatus {
    /// Accepted by the replica.
    Ok,
    /// Generic store failure.
    Failed,
    /// Store failed because an entry was unexpectedly present.
    FailedNotAbsent,
    /// Store rejected by the replica's security check.
    FailedSecurity,
    /// Concurrent version detected.
    VersionConflict,
    /// Concurrent version detected; the offered parent is unknown.
    VersionConflictNoBasedOn,
    /// Concurrent version detected; the offered version key is missing.
    VersionConflictNoVersionKey,
    /// Concurrent version detected; the offered timestamp is older.
    VersionConflictOldTimestamp,
}

impl PutStatus {
    /// Hard failure codes, counted in the fail-majority test.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Self::Failed | Self::FailedNotAbsent | Self::FailedSecurity
        )
    }

    /// Conflict codes; any one fails the whole put without retry.
    pub fn is_version_conflict(self) -> bool {
        matches!(
            self,
            Self::VersionConflict
                | Self::VersionConflictNoBasedOn
                | Self::VersionConflictNoVersionKey
                | Self::VersionConflictOldTimestamp
        )
    }
}

/// Raw outcome of a replicated put: per peer, per version key, a status.
///
/// A peer mapped to `None` answered but contributed nothing usable; it
/// counts as a single failure response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPutResult {
    /// Per-peer status maps; `None` marks a null peer entry.
    pub peers: BTreeMap<PeerId, Option<BTreeMap<VersionKey, PutStatus>>>,
}

impl RawPutResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a peer's status map.
    pub fn insert(&mut self, peer: PeerId, statuses: BTreeMap<VersionKey, PutStatus>) {
        self.peers.insert(peer, Some(statuses));
    }

    /// Record a null peer entry.
    pub fn insert_null(&mut self, peer: PeerId) {
        self.peers.insert(peer, None);
    }

    /// Whether no peer answered at all.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Iterate over all individual status responses; a null peer entry
    /// yields a single `None`.
    pub fn responses(&self) -> impl Iterator<Item = Option<PutStatus>> + '_ {
        self.peers.values().flat_map(|entry| {
            let null = entry.is_none().then_some(None);
            entry
                .iter()
                .flat_map(|statuses| statuses.values().map(|status| Some(*status)))
                .chain(null)
        })
    }
}

/// One entry of a peer's key digest: a revision and its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestEntry {
    /// The revision this entry describes.
    pub version_key: VersionKey,
    /// The parent the revision was based on.
    pub based_on: VersionKey,
}

/// A peer's report of the version history it holds for one content item.
///
/// Entries are ordered newest-first as delivered by the replica; `first()`
/// is the revision the peer currently ranks as head.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDigest {
    /// History entries, newest first.
    pub entries: Vec<DigestEntry>,
}

impl KeyDigest {
    /// Create an empty digest.
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry the peer ranks as newest, if any.
    pub fn first(&self) -> Option<&DigestEntry> {
        self.entries.first()
    }

    /// Whether the digest records the given revision.
    pub fn contains_version(&self, version_key: VersionKey) -> bool {
        self.entries.iter().any(|e| e.version_key == version_key)
    }

    /// The first entry whose parent equals `based_on`, if any.
    pub fn successor_of(&self, based_on: VersionKey) -> Option<&DigestEntry> {
        self.entries.iter().find(|e| e.based_on == based_on)
    }

    /// Whether the digest holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Range of versions a digest query covers for one content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestRange {
    /// The storage location queried.
    pub location_key: LocationKey,
    /// The content item queried.
    pub content_key: ContentKey,
    /// Lower version bound, inclusive.
    pub from_version: VersionKey,
    /// Upper version bound, inclusive.
    pub to_version: VersionKey,
}

impl DigestRange {
    /// The full version range for one content item.
    pub fn full(location_key: LocationKey, content_key: ContentKey) -> Self {
        Self {
            location_key,
            content_key,
            from_version: VersionKey::zero(),
            to_version: VersionKey::max(),
        }
    }
}
