//! # Roost Core - Foundation
//!
//! Single source of truth for the domain types and effect interfaces shared
//! by the Roost write-verification and liveness layers.
//!
//! This crate contains only pure data types and trait definitions:
//!
//! - Identifier types: [`PeerId`], [`VersionKey`], [`LocationKey`], [`ContentKey`]
//! - Content model: [`NetworkContent`], [`PutStatus`], [`RawPutResult`], [`KeyDigest`]
//! - The per-user [`Locations`] set
//! - Effect trait interfaces for the DHT data layer ([`DataEffects`]) and the
//!   direct-messaging layer ([`NetworkEffects`])
//! - The deterministic peer ordering helper [`choose_first`]
//!
//! Implementations of the effect traits live outside this crate: production
//! handlers wrap the real DHT and transport, and `roost-testkit` provides
//! scripted mocks for tests.

#![forbid(unsafe_code)]

pub mod content;
pub mod effects;
pub mod errors;
pub mod identifiers;
pub mod locations;
pub mod messages;
pub mod ordering;

pub use content::{
    DigestEntry, DigestRange, KeyDigest, NetworkContent, PutStatus, RawPutResult,
};
pub use effects::data::{DataEffects, StorageError};
pub use effects::network::{
    DirectReply, KeyPair, NetworkEffects, NetworkError, PublicKey,
};
pub use errors::{Result, RoostError};
pub use identifiers::{ContentKey, LocationKey, PeerId, VersionKey};
pub use locations::{LocationEntry, Locations};
pub use messages::ContactPeerMessage;
pub use ordering::choose_first;
