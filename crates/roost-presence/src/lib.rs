//! # Roost Presence - post-login liveness pass
//!
//! After a login, the stored locations list for a user may name endpoints
//! that have since gone away. This crate contacts each previously-known
//! endpoint with a nonce challenge under a bounded wait, rebuilds the
//! locations list from the peers that answered correctly plus self, and
//! deterministically elects one member of that set as master for the
//! user's shared message queue.
//!
//! The reconciler never fails: whatever has been learned when the deadline
//! fires is the new view. A peer is dropped for any of: send failure, no
//! reply in time, or a reply that does not echo its challenge byte-exact.

#![forbid(unsafe_code)]

pub mod config;
pub mod election;
pub mod evidence;
pub mod hooks;
pub mod reconciler;

pub use config::PresenceConfig;
pub use election::{elect, Election};
pub use evidence::EvidenceNonce;
pub use hooks::{LatePeerHook, NullLatePeerHook};
pub use reconciler::{LocationsReconciler, Reconciled};
