//! Replication runtime configuration.

/// Tunables for the put verification loop.
#[derive(Debug, Clone)]
pub struct ReplicationConfig {
    /// Maximum number of re-issues after the initial put attempt.
    pub put_retries: u32,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self { put_retries: 3 }
    }
}
