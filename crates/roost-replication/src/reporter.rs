//! Exactly-once completion reporting with compensating cleanup.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use roost_core::{ContentKey, DataEffects, LocationKey, VersionKey};

use crate::listener::PutListener;

/// Mediates the terminal notification for one verified put.
///
/// Guarantees exactly one terminal call to the listener across all paths,
/// and that a compensating version removal has been attempted before any
/// failure notification. The removal outcome is logged only; cleanup can
/// never convert a failure into a success.
pub struct CompletionReporter {
    listener: Arc<dyn PutListener>,
    notified: AtomicBool,
}

impl CompletionReporter {
    /// Create a reporter for one put.
    pub fn new(listener: Arc<dyn PutListener>) -> Self {
        Self {
            listener,
            notified: AtomicBool::new(false),
        }
    }

    /// Whether a terminal notification has already been delivered.
    pub fn is_notified(&self) -> bool {
        self.notified.load(Ordering::SeqCst)
    }

    /// Atomically claim the right to notify; late completions lose.
    fn claim(&self) -> bool {
        !self.notified.swap(true, Ordering::SeqCst)
    }

    /// Deliver the success notification. Returns whether this call was the
    /// terminal one; a repeated completion is discarded.
    pub async fn report_success(&self) -> bool {
        if !self.claim() {
            debug!("late put completion discarded after terminal notification");
            return false;
        }
        self.listener.on_put_success().await;
        true
    }

    /// Attempt the compensating removal, then deliver the failure
    /// notification. Returns whether this call was the terminal one.
    pub async fn report_failure<D: DataEffects>(
        &self,
        data: &D,
        location_key: &LocationKey,
        content_key: &ContentKey,
        version_key: VersionKey,
    ) -> bool {
        if !self.claim() {
            debug!("late put completion discarded after terminal notification");
            return false;
        }

        match data
            .remove_version(location_key, content_key, version_key)
            .await
        {
            Ok(()) => debug!(
                %version_key,
                location_key = %location_key,
                content_key = %content_key,
                "compensating removal completed"
            ),
            Err(error) => warn!(
                %version_key,
                %error,
                "compensating removal failed; replicas may hold a stale version"
            ),
        }

        self.listener.on_put_failure().await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use roost_core::{
        DigestRange, KeyDigest, NetworkContent, PeerId, RawPutResult, StorageError,
    };
    use std::collections::BTreeMap;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingListener {
        successes: AtomicUsize,
        failures: AtomicUsize,
    }

    #[async_trait]
    impl PutListener for CountingListener {
        async fn on_put_success(&self) {
            self.successes.fetch_add(1, Ordering::SeqCst);
        }

        async fn on_put_failure(&self) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Records the order of data-layer calls relative to notification.
    #[derive(Default)]
    struct RecordingData {
        removes: Mutex<Vec<VersionKey>>,
    }

    #[async_trait]
    impl DataEffects for RecordingData {
        async fn put(
            &self,
            _location_key: &LocationKey,
            _content_key: &ContentKey,
            _content: NetworkContent,
        ) -> Result<RawPutResult, StorageError> {
            Ok(RawPutResult::new())
        }

        async fn remove_version(
            &self,
            _location_key: &LocationKey,
            _content_key: &ContentKey,
            version_key: VersionKey,
        ) -> Result<(), StorageError> {
            self.removes.lock().push(version_key);
            Ok(())
        }

        async fn get_digest(
            &self,
            _range: DigestRange,
        ) -> Result<BTreeMap<PeerId, KeyDigest>, StorageError> {
            Ok(BTreeMap::new())
        }
    }

    fn vk(seed: u8) -> VersionKey {
        VersionKey::new([seed; 32])
    }

    #[tokio::test]
    async fn success_notifies_exactly_once() {
        let listener = Arc::new(CountingListener::default());
        let reporter = CompletionReporter::new(listener.clone());

        assert!(reporter.report_success().await);
        assert!(!reporter.report_success().await);
        assert_eq!(listener.successes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_after_success_is_discarded() {
        let listener = Arc::new(CountingListener::default());
        let reporter = CompletionReporter::new(listener.clone());
        let data = RecordingData::default();

        assert!(reporter.report_success().await);
        assert!(
            !reporter
                .report_failure(&data, &"loc".into(), &"content".into(), vk(1))
                .await
        );

        assert_eq!(listener.successes.load(Ordering::SeqCst), 1);
        assert_eq!(listener.failures.load(Ordering::SeqCst), 0);
        // The discarded failure path must not have issued cleanup either.
        assert!(data.removes.lock().is_empty());
    }

    #[tokio::test]
    async fn failure_issues_cleanup_before_notifying() {
        let listener = Arc::new(CountingListener::default());
        let reporter = CompletionReporter::new(listener.clone());
        let data = RecordingData::default();

        assert!(
            reporter
                .report_failure(&data, &"loc".into(), &"content".into(), vk(7))
                .await
        );

        assert_eq!(data.removes.lock().as_slice(), &[vk(7)]);
        assert_eq!(listener.failures.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_cleanup_still_notifies_failure() {
        struct FailingData;

        #[async_trait]
        impl DataEffects for FailingData {
            async fn put(
                &self,
                _location_key: &LocationKey,
                _content_key: &ContentKey,
                _content: NetworkContent,
            ) -> Result<RawPutResult, StorageError> {
                Err(StorageError::unavailable("offline"))
            }

            async fn remove_version(
                &self,
                _location_key: &LocationKey,
                _content_key: &ContentKey,
                _version_key: VersionKey,
            ) -> Result<(), StorageError> {
                Err(StorageError::remove_failed("no replicas reachable"))
            }

            async fn get_digest(
                &self,
                _range: DigestRange,
            ) -> Result<BTreeMap<PeerId, KeyDigest>, StorageError> {
                Err(StorageError::unavailable("offline"))
            }
        }

        let listener = Arc::new(CountingListener::default());
        let reporter = CompletionReporter::new(listener.clone());

        assert!(
            reporter
                .report_failure(&FailingData, &"loc".into(), &"content".into(), vk(1))
                .await
        );
        assert_eq!(listener.failures.load(Ordering::SeqCst), 1);
    }
}
