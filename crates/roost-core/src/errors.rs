//! Unified error type for Roost operations.

use serde::{Deserialize, Serialize};

use crate::effects::data::StorageError;
use crate::effects::network::NetworkError;

/// Result alias using the unified error type.
pub type Result<T> = std::result::Result<T, RoostError>;

/// Unified error type for Roost operations.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum RoostError {
    /// Invalid input or configuration.
    #[error("Invalid: {message}")]
    Invalid {
        /// What was invalid.
        message: String,
    },

    /// Network or transport error.
    #[error("Network error: {message}")]
    Network {
        /// What failed on the wire.
        message: String,
    },

    /// DHT storage operation failed.
    #[error("Storage error: {message}")]
    Storage {
        /// What failed in the data layer.
        message: String,
    },

    /// Serialization or deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// What failed to encode or decode.
        message: String,
    },

    /// Internal invariant violation.
    #[error("Internal error: {message}")]
    Internal {
        /// What went wrong.
        message: String,
    },
}

impl RoostError {
    /// Create an invalid input error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying the operation could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Storage { .. })
    }
}

impl From<StorageError> for RoostError {
    fn from(err: StorageError) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<NetworkError> for RoostError {
    fn from(err: NetworkError) -> Self {
        Self::network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable() {
        assert!(RoostError::network("peer gone").is_retryable());
        assert!(RoostError::storage("put timed out").is_retryable());
        assert!(!RoostError::invalid("bad key").is_retryable());
        assert!(!RoostError::internal("state machine hole").is_retryable());
    }

    #[test]
    fn effect_errors_convert() {
        let err: RoostError = StorageError::unavailable("no replicas").into();
        assert!(matches!(err, RoostError::Storage { .. }));
    }
}
