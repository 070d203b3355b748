//! The per-user locations set.
//!
//! A user's locations list names every client endpoint known to hold their
//! data. The set is unordered with uniqueness by peer; after a liveness
//! reconciliation it contains the local peer exactly once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::identifiers::PeerId;

/// One known client endpoint of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationEntry {
    peer: PeerId,
}

impl LocationEntry {
    /// Create an entry for a peer.
    pub fn new(peer: PeerId) -> Self {
        Self { peer }
    }

    /// The peer this entry names.
    pub fn peer(&self) -> PeerId {
        self.peer
    }
}

impl From<PeerId> for LocationEntry {
    fn from(peer: PeerId) -> Self {
        Self::new(peer)
    }
}

/// A user's set of known client endpoints.
///
/// BTreeSet keeps iteration deterministic, which master election relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locations {
    user_id: String,
    entries: BTreeSet<LocationEntry>,
}

impl Locations {
    /// Create an empty locations set for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            entries: BTreeSet::new(),
        }
    }

    /// The user this set belongs to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Add a peer; a duplicate insert is a no-op.
    pub fn insert(&mut self, peer: PeerId) {
        self.entries.insert(LocationEntry::new(peer));
    }

    /// Remove a peer if present; returns whether it was present.
    pub fn remove(&mut self, peer: PeerId) -> bool {
        self.entries.remove(&LocationEntry::new(peer))
    }

    /// Whether the set names this peer.
    pub fn contains(&self, peer: PeerId) -> bool {
        self.entries.contains(&LocationEntry::new(peer))
    }

    /// Iterate the peers in the set, in identifier order.
    pub fn peers(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.entries.iter().map(LocationEntry::peer)
    }

    /// The peers as an owned ordered set.
    pub fn peer_set(&self) -> BTreeSet<PeerId> {
        self.peers().collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
