//! Presence runtime configuration.

use std::time::Duration;

/// Tunables for the liveness pass.
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    /// How long to wait for probe replies before finalizing the view.
    pub contact_await: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            contact_await: Duration::from_millis(10_000),
        }
    }
}
