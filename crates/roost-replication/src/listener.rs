//! Put outcome listeners.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Observer for the terminal outcome of one verified put.
///
/// Exactly one of the two callbacks fires per put, mediated by the
/// completion reporter.
#[async_trait]
pub trait PutListener: Send + Sync {
    /// The write reached a quorum and survived digest verification.
    async fn on_put_success(&self);

    /// The write was withdrawn: conflict, lost concurrency race,
    /// exhausted retries, or unavailable digests.
    async fn on_put_failure(&self);
}

/// Terminal outcome of a verified put, as delivered over a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The write stands.
    Success,
    /// The write was withdrawn.
    Failure,
}

/// Listener that forwards the outcome into a channel, for callers that
/// prefer awaiting the result over implementing a trait.
#[derive(Debug)]
pub struct ChannelPutListener {
    tx: mpsc::UnboundedSender<PutOutcome>,
}

#[async_trait]
impl PutListener for ChannelPutListener {
    async fn on_put_success(&self) {
        // Receiver may be gone; the put itself already completed.
        let _ = self.tx.send(PutOutcome::Success);
    }

    async fn on_put_failure(&self) {
        let _ = self.tx.send(PutOutcome::Failure);
    }
}

/// Create a channel-backed listener and the receiver for its outcome.
pub fn outcome_channel() -> (Arc<ChannelPutListener>, mpsc::UnboundedReceiver<PutOutcome>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelPutListener { tx }), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_listener_delivers_outcome() {
        let (listener, mut rx) = outcome_channel();
        listener.on_put_success().await;
        assert_eq!(rx.recv().await, Some(PutOutcome::Success));
    }

    #[tokio::test]
    async fn dropped_receiver_is_tolerated() {
        let (listener, rx) = outcome_channel();
        drop(rx);
        listener.on_put_failure().await;
    }
}
