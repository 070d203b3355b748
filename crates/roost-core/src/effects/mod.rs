//! Effect trait interfaces.
//!
//! These traits are the seams between the verification/liveness cores and
//! the systems they drive. The cores only ever hold `Arc<dyn …>` handles;
//! production handlers wrap the real DHT and transport, tests use the
//! scripted handlers from `roost-testkit`.

pub mod data;
pub mod network;
