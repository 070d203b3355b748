//! Pure put-verification decision rules.
//!
//! These functions contain no I/O and can be property tested. The verifier
//! drives them with the raw replica responses and digests it collects.

use roost_core::{KeyDigest, PutStatus, RawPutResult, VersionKey};

/// What to do with a completed put attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutDecision {
    /// A replica reported a version conflict; fail without retry.
    Conflict,
    /// A strict majority of responses accepted; verify against the digests.
    Verify,
    /// Transient failure shape; re-issue the put.
    Retry,
}

/// Classify the per-replica status maps of one put attempt.
///
/// Conflicts dominate: a single conflict code fails the put outright,
/// because a conflict is a statement about the version history, not about
/// this attempt's delivery. Otherwise the put proceeds to verification only
/// if failures are a strict minority of all responses.
pub fn classify_responses(raw: &RawPutResult) -> PutDecision {
    if raw.is_empty() {
        return PutDecision::Retry;
    }

    let mut responses = 0usize;
    let mut failures = 0usize;
    let mut conflicts = 0usize;

    for response in raw.responses() {
        responses += 1;
        match response {
            None => failures += 1,
            Some(status) if status.is_version_conflict() => conflicts += 1,
            Some(status) if status.is_failure() => failures += 1,
            Some(PutStatus::Ok) => {}
            Some(_) => {}
        }
    }

    if conflicts > 0 {
        PutDecision::Conflict
    } else if failures * 2 < responses {
        PutDecision::Verify
    } else {
        PutDecision::Retry
    }
}

/// Why the local write survives a concurrent-writer comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeWinReason {
    /// The peer's history does not record our parent at all; one broken
    /// replica does not get to veto a write.
    MissingParent,
    /// Our parent is the peer's head and no successor is recorded.
    NoSuccessorAtHead,
    /// The peer records our parent but its history is otherwise unusable.
    CorruptHistory,
    /// The competing successor carries our exact version key.
    EqualVersionTie,
    /// The competing successor sorts after our version key.
    SuccessorNewer,
}

/// Verdict of the winner rule over one peer's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinnerVerdict {
    /// The local write stands on this peer.
    WeWin(WeWinReason),
    /// The concurrent write came first in the deterministic order; ours
    /// must be withdrawn.
    TheyWin,
}

/// Outcome of checking one peer's digest against the local write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestOutcome {
    /// The peer ranks our write as its current head.
    Newest,
    /// Our write is present in the peer's history with newer writes on top.
    InHistory,
    /// A concurrent write exists but ours wins on this peer.
    WeWin(WeWinReason),
    /// A concurrent write exists and it wins; the put must fail.
    TheyWin,
}

/// Decide, for one peer that does not hold our write, whose write stands.
///
/// The rule never lets a single anomalous replica veto a write: a history
/// that omits our parent, records no successor for it, or skips links is
/// overruled. Ties on the version key favor the local write to break
/// livelock between two writers that would otherwise each defer forever.
pub fn winner_rule(
    digest: &KeyDigest,
    version_key: VersionKey,
    based_on: VersionKey,
) -> WinnerVerdict {
    if !digest.contains_version(based_on) {
        return WinnerVerdict::WeWin(WeWinReason::MissingParent);
    }

    let successor = match digest.successor_of(based_on) {
        Some(entry) => entry,
        None => {
            return if digest.first().map(|e| e.version_key) == Some(based_on) {
                WinnerVerdict::WeWin(WeWinReason::NoSuccessorAtHead)
            } else {
                WinnerVerdict::WeWin(WeWinReason::CorruptHistory)
            };
        }
    };

    match successor.version_key.cmp(&version_key) {
        std::cmp::Ordering::Equal => WinnerVerdict::WeWin(WeWinReason::EqualVersionTie),
        std::cmp::Ordering::Less => WinnerVerdict::TheyWin,
        std::cmp::Ordering::Greater => WinnerVerdict::WeWin(WeWinReason::SuccessorNewer),
    }
}

/// Judge one peer's digest against our `(version, parent)` pair.
///
/// Our write being the peer's head, or present anywhere in its history,
/// means it succeeded on that peer; otherwise a concurrent writer displaced
/// it and [`winner_rule`] decides whose write stands.
pub fn judge_peer_digest(
    digest: &KeyDigest,
    version_key: VersionKey,
    based_on: VersionKey,
) -> DigestOutcome {
    if digest.first().map(|e| e.version_key) == Some(version_key) {
        return DigestOutcome::Newest;
    }
    if digest.contains_version(version_key) {
        return DigestOutcome::InHistory;
    }

    match winner_rule(digest, version_key, based_on) {
        WinnerVerdict::WeWin(reason) => DigestOutcome::WeWin(reason),
        WinnerVerdict::TheyWin => DigestOutcome::TheyWin,
    }
}
