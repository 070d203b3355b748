//! Reconciler extension hooks.

use roost_core::PeerId;

/// Hook invoked for a peer whose correct reply arrived after finalization.
///
/// Such a peer was already dropped from the rebuilt locations list. What to
/// tell it is an open protocol question upstream; until that is settled the
/// reconciler only reports the event here.
pub trait LatePeerHook: Send + Sync {
    /// A correct reply from `peer` arrived after the view was finalized.
    fn on_late_reply(&self, peer: PeerId);
}

/// Default hook that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLatePeerHook;

impl LatePeerHook for NullLatePeerHook {
    fn on_late_reply(&self, _peer: PeerId) {}
}
