//! Deterministic master election.

use std::collections::BTreeSet;

use roost_core::{choose_first, PeerId};

/// Result of a master election over the reconciled peer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Election {
    /// The elected master.
    pub master: PeerId,
    /// Whether the local peer is the master.
    pub is_master: bool,
}

/// Elect the master for a login session.
///
/// The pool is the alive peers plus self, so it is never empty, and every
/// member that evaluates the same pool elects the same peer.
pub fn elect(alive: &BTreeSet<PeerId>, local: PeerId) -> Election {
    let mut pool = alive.clone();
    pool.insert(local);
    let master = choose_first(&pool);
    Election {
        master,
        is_master: master == local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(seed: u8) -> PeerId {
        PeerId::new([seed; 32])
    }

    #[test]
    fn lowest_peer_wins() {
        let alive: BTreeSet<_> = [peer(2), peer(3)].into_iter().collect();
        let election = elect(&alive, peer(1));
        assert_eq!(election.master, peer(1));
        assert!(election.is_master);
    }

    #[test]
    fn local_peer_can_lose() {
        let alive: BTreeSet<_> = [peer(2)].into_iter().collect();
        let election = elect(&alive, peer(3));
        assert_eq!(election.master, peer(2));
        assert!(!election.is_master);
    }

    #[test]
    fn empty_alive_set_elects_self() {
        let election = elect(&BTreeSet::new(), peer(9));
        assert_eq!(election.master, peer(9));
        assert!(election.is_master);
    }
}
