//! Deterministic peer ordering.

use std::collections::BTreeSet;

use crate::identifiers::PeerId;

/// Return the least peer under the transport's stable total order.
///
/// Used solely for deterministic master election; every participant that
/// evaluates the same set elects the same peer.
///
/// # Panics
///
/// Panics on an empty set. Election pools always contain the local peer.
pub fn choose_first(peers: &BTreeSet<PeerId>) -> PeerId {
    match peers.iter().next() {
        Some(peer) => *peer,
        None => panic!("choose_first requires a non-empty peer set"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(seed: u8) -> PeerId {
        PeerId::new([seed; 32])
    }

    #[test]
    fn returns_least_peer() {
        let peers: BTreeSet<_> = [peer(7), peer(2), peer(9)].into_iter().collect();
        assert_eq!(choose_first(&peers), peer(2));
    }

    #[test]
    fn singleton_set_returns_its_element() {
        let peers: BTreeSet<_> = [peer(4)].into_iter().collect();
        assert_eq!(choose_first(&peers), peer(4));
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn empty_set_panics() {
        choose_first(&BTreeSet::new());
    }

    proptest::proptest! {
        #[test]
        fn chosen_peer_is_a_lower_bound(seeds in proptest::collection::btree_set(0u8..=255, 1..16)) {
            let peers: BTreeSet<_> = seeds.iter().map(|&s| peer(s)).collect();
            let chosen = choose_first(&peers);
            proptest::prop_assert!(peers.contains(&chosen));
            for member in &peers {
                proptest::prop_assert!(chosen <= *member);
            }
        }
    }
}
