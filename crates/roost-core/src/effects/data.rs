//! Data layer effect trait.
//!
//! The data layer issues replicated operations over the DHT. How content is
//! routed, replicated, and stored is opaque here; the verification core only
//! sees the per-replica outcome maps.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::content::{DigestRange, KeyDigest, NetworkContent, RawPutResult};
use crate::identifiers::{ContentKey, LocationKey, PeerId, VersionKey};

/// Data layer operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    /// The replicated put could not be issued or did not complete.
    #[error("Put failed: {reason}")]
    PutFailed {
        /// Why the put failed.
        reason: String,
    },
    /// The version removal could not be issued or did not complete.
    #[error("Remove failed: {reason}")]
    RemoveFailed {
        /// Why the removal failed.
        reason: String,
    },
    /// The digest query could not be issued or did not complete.
    #[error("Digest query failed: {reason}")]
    DigestFailed {
        /// Why the query failed.
        reason: String,
    },
    /// The data layer is not reachable at all.
    #[error("Data layer unavailable: {reason}")]
    Unavailable {
        /// Why the layer is unavailable.
        reason: String,
    },
}

impl StorageError {
    /// Create a put failure.
    pub fn put_failed(reason: impl Into<String>) -> Self {
        Self::PutFailed {
            reason: reason.into(),
        }
    }

    /// Create a remove failure.
    pub fn remove_failed(reason: impl Into<String>) -> Self {
        Self::RemoveFailed {
            reason: reason.into(),
        }
    }

    /// Create a digest query failure.
    pub fn digest_failed(reason: impl Into<String>) -> Self {
        Self::DigestFailed {
            reason: reason.into(),
        }
    }

    /// Create an unavailability error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Replicated DHT operations consumed by the write-verification core.
#[async_trait]
pub trait DataEffects: Send + Sync {
    /// Store one revision on the responsible replica set and collect the
    /// per-replica status maps.
    async fn put(
        &self,
        location_key: &LocationKey,
        content_key: &ContentKey,
        content: NetworkContent,
    ) -> Result<RawPutResult, StorageError>;

    /// Best-effort removal of one revision from the replica set.
    async fn remove_version(
        &self,
        location_key: &LocationKey,
        content_key: &ContentKey,
        version_key: VersionKey,
    ) -> Result<(), StorageError>;

    /// Collect each responding replica's version history for a content item.
    async fn get_digest(
        &self,
        range: DigestRange,
    ) -> Result<BTreeMap<PeerId, KeyDigest>, StorageError>;
}

#[async_trait]
impl<T: DataEffects + ?Sized> DataEffects for Arc<T> {
    async fn put(
        &self,
        location_key: &LocationKey,
        content_key: &ContentKey,
        content: NetworkContent,
    ) -> Result<RawPutResult, StorageError> {
        (**self).put(location_key, content_key, content).await
    }

    async fn remove_version(
        &self,
        location_key: &LocationKey,
        content_key: &ContentKey,
        version_key: VersionKey,
    ) -> Result<(), StorageError> {
        (**self)
            .remove_version(location_key, content_key, version_key)
            .await
    }

    async fn get_digest(
        &self,
        range: DigestRange,
    ) -> Result<BTreeMap<PeerId, KeyDigest>, StorageError> {
        (**self).get_digest(range).await
    }
}
