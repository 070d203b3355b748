//! # Roost Testkit - scripted effect handlers
//!
//! Deterministic, scriptable implementations of the core effect traits so
//! verifier and reconciler tests can stage exact replica responses and peer
//! probe behaviors without a network.

#![forbid(unsafe_code)]

pub mod data;
pub mod network;

pub use data::ScriptedData;
pub use network::{ProbeBehavior, ScriptedNetwork};

/// Initialize test logging once; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
