//! Scripted data layer.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

use roost_core::{
    ContentKey, DataEffects, DigestRange, KeyDigest, LocationKey, NetworkContent, PeerId,
    RawPutResult, StorageError, VersionKey,
};

type DigestMap = BTreeMap<PeerId, KeyDigest>;

/// Data handler that replays scripted responses in order.
///
/// Each `put` consumes the next scripted put response, each `get_digest`
/// the next scripted digest response; an exhausted script answers with an
/// unavailability error. All calls are recorded for assertions.
#[derive(Default)]
pub struct ScriptedData {
    put_script: Mutex<VecDeque<Result<RawPutResult, StorageError>>>,
    digest_script: Mutex<VecDeque<Result<DigestMap, StorageError>>>,
    put_calls: Mutex<Vec<NetworkContent>>,
    digest_calls: Mutex<Vec<DigestRange>>,
    removed_versions: Mutex<Vec<VersionKey>>,
}

impl ScriptedData {
    /// Create a handler with empty scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful put response.
    pub fn script_put(&self, result: RawPutResult) {
        self.put_script.lock().push_back(Ok(result));
    }

    /// Queue a failed put attempt.
    pub fn script_put_error(&self, error: StorageError) {
        self.put_script.lock().push_back(Err(error));
    }

    /// Queue a digest response.
    pub fn script_digest(&self, digests: DigestMap) {
        self.digest_script.lock().push_back(Ok(digests));
    }

    /// Queue a failed digest probe.
    pub fn script_digest_error(&self, error: StorageError) {
        self.digest_script.lock().push_back(Err(error));
    }

    /// Contents of every put issued so far, in order.
    pub fn put_calls(&self) -> Vec<NetworkContent> {
        self.put_calls.lock().clone()
    }

    /// Ranges of every digest probe issued so far, in order.
    pub fn digest_calls(&self) -> Vec<DigestRange> {
        self.digest_calls.lock().clone()
    }

    /// Versions removed so far, in order.
    pub fn removed_versions(&self) -> Vec<VersionKey> {
        self.removed_versions.lock().clone()
    }
}

#[async_trait]
impl DataEffects for ScriptedData {
    async fn put(
        &self,
        _location_key: &LocationKey,
        _content_key: &ContentKey,
        content: NetworkContent,
    ) -> Result<RawPutResult, StorageError> {
        self.put_calls.lock().push(content);
        self.put_script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(StorageError::unavailable("put script exhausted")))
    }

    async fn remove_version(
        &self,
        _location_key: &LocationKey,
        _content_key: &ContentKey,
        version_key: VersionKey,
    ) -> Result<(), StorageError> {
        debug!(%version_key, "scripted remove recorded");
        self.removed_versions.lock().push(version_key);
        Ok(())
    }

    async fn get_digest(&self, range: DigestRange) -> Result<DigestMap, StorageError> {
        self.digest_calls.lock().push(range);
        self.digest_script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(StorageError::unavailable("digest script exhausted")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_is_consumed_in_order() {
        let data = ScriptedData::new();
        let mut first = RawPutResult::new();
        first.insert_null(PeerId::new([1u8; 32]));
        data.script_put(first.clone());

        let content = NetworkContent::root(VersionKey::new([1u8; 32]), vec![1]);
        let got = data
            .put(&"loc".into(), &"content".into(), content.clone())
            .await
            .expect("scripted response");
        assert_eq!(got, first);

        // Script exhausted: the next call errors.
        assert!(data
            .put(&"loc".into(), &"content".into(), content)
            .await
            .is_err());
        assert_eq!(data.put_calls().len(), 2);
    }
}
