//! The put verification state machine.

use std::sync::Arc;
use tracing::{debug, error, warn};

use roost_core::{
    ContentKey, DataEffects, DigestRange, LocationKey, NetworkContent, PeerId,
};

use crate::config::ReplicationConfig;
use crate::listener::PutListener;
use crate::logic::{self, DigestOutcome, PutDecision, WeWinReason};
use crate::reporter::CompletionReporter;

/// Where the verifier currently is in its lifecycle.
///
/// Terminal notification is delegated to the completion reporter, which
/// enforces the at-most-once guarantee independently of these labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerifyPhase {
    /// The replicated put is in flight.
    Issuing,
    /// Replica responses are being classified.
    Classifying,
    /// A transient failure is being compensated before re-issue.
    Retrying,
    /// The digest probe is in flight or being checked.
    Verifying,
}

/// Result of one digest verification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DigestCheck {
    /// Every responding peer accepts our write.
    AllPass,
    /// A concurrent writer won on some peer.
    Lost,
    /// No digest could be collected at all.
    Unavailable,
}

/// Single-use driver for one verified put.
///
/// `verify` consumes the instance, drives the write to a terminal state,
/// and invokes the listener exactly once through the completion reporter.
pub struct PutVerifier<D: DataEffects> {
    data: Arc<D>,
    config: ReplicationConfig,
    location_key: LocationKey,
    content_key: ContentKey,
    content: NetworkContent,
    reporter: CompletionReporter,
    phase: VerifyPhase,
    retry_count: u32,
}

impl<D: DataEffects> PutVerifier<D> {
    /// Create a verifier for one write.
    pub fn new(
        data: Arc<D>,
        config: ReplicationConfig,
        location_key: LocationKey,
        content_key: ContentKey,
        content: NetworkContent,
        listener: Arc<dyn PutListener>,
    ) -> Self {
        Self {
            data,
            config,
            location_key,
            content_key,
            content,
            reporter: CompletionReporter::new(listener),
            phase: VerifyPhase::Issuing,
            retry_count: 0,
        }
    }

    /// Drive the put to completion.
    ///
    /// Issues the replicated put, classifies the replies, retries bounded
    /// by the configured budget, verifies an apparent success against the
    /// replica digests, and notifies the listener exactly once.
    pub async fn verify(mut self) {
        loop {
            self.phase = VerifyPhase::Issuing;
            debug!(
                phase = ?self.phase,
                version_key = %self.content.version_key,
                attempt = self.retry_count + 1,
                "issuing replicated put"
            );
            let put_result = self
                .data
                .put(&self.location_key, &self.content_key, self.content.clone())
                .await;

            self.phase = VerifyPhase::Classifying;
            let decision = match &put_result {
                Ok(raw) => logic::classify_responses(raw),
                Err(error) => {
                    warn!(
                        version_key = %self.content.version_key,
                        %error,
                        "put attempt failed outright"
                    );
                    PutDecision::Retry
                }
            };

            match decision {
                PutDecision::Conflict => {
                    debug!(
                        version_key = %self.content.version_key,
                        "replica reported version conflict; failing without retry"
                    );
                    return self.fail().await;
                }
                PutDecision::Verify => {
                    self.phase = VerifyPhase::Verifying;
                    match self.check_digests().await {
                        DigestCheck::AllPass => return self.succeed().await,
                        DigestCheck::Lost | DigestCheck::Unavailable => {
                            return self.fail().await
                        }
                    }
                }
                PutDecision::Retry => {
                    if self.retry_count >= self.config.put_retries {
                        warn!(
                            version_key = %self.content.version_key,
                            retries = self.retry_count,
                            "retry budget exhausted"
                        );
                        return self.fail().await;
                    }
                    self.retry_count += 1;
                    self.phase = VerifyPhase::Retrying;
                    debug!(
                        version_key = %self.content.version_key,
                        attempt = self.retry_count,
                        "retrying put after transient failure"
                    );

                    // Withdraw whatever a partial quorum accepted so the
                    // re-issue does not stack duplicate replicas. Outcome
                    // does not gate the retry.
                    if let Err(error) = self
                        .data
                        .remove_version(
                            &self.location_key,
                            &self.content_key,
                            self.content.version_key,
                        )
                        .await
                    {
                        debug!(
                            version_key = %self.content.version_key,
                            %error,
                            "interim removal before retry failed"
                        );
                    }
                }
            }
        }
    }

    /// Probe the replica digests and judge each responding peer.
    async fn check_digests(&self) -> DigestCheck {
        let range = DigestRange::full(self.location_key.clone(), self.content_key.clone());
        let digests = match self.data.get_digest(range).await {
            Ok(digests) => digests,
            Err(error) => {
                warn!(
                    version_key = %self.content.version_key,
                    %error,
                    "digest probe failed"
                );
                return DigestCheck::Unavailable;
            }
        };
        if digests.is_empty() {
            warn!(
                version_key = %self.content.version_key,
                "no peer answered the digest probe"
            );
            return DigestCheck::Unavailable;
        }

        for (peer, digest) in &digests {
            let outcome = logic::judge_peer_digest(
                digest,
                self.content.version_key,
                self.content.based_on,
            );
            match outcome {
                DigestOutcome::Newest | DigestOutcome::InHistory => {}
                DigestOutcome::WeWin(reason) => self.log_overruled_peer(*peer, reason),
                DigestOutcome::TheyWin => {
                    warn!(
                        peer = %peer,
                        location_key = %self.location_key,
                        content_key = %self.content_key,
                        version_key = %self.content.version_key,
                        "concurrent write won on peer; withdrawing ours"
                    );
                    return DigestCheck::Lost;
                }
            }
        }

        DigestCheck::AllPass
    }

    /// Record why a peer's dissenting history was overruled.
    fn log_overruled_peer(&self, peer: PeerId, reason: WeWinReason) {
        match reason {
            WeWinReason::EqualVersionTie => error!(
                peer = %peer,
                version_key = %self.content.version_key,
                "concurrent write carries our exact version key; taking the tie"
            ),
            WeWinReason::MissingParent => warn!(
                peer = %peer,
                based_on = %self.content.based_on,
                "peer history omits our parent version; overruling it"
            ),
            WeWinReason::NoSuccessorAtHead => warn!(
                peer = %peer,
                based_on = %self.content.based_on,
                "peer records our parent as head with no successor; overruling it"
            ),
            WeWinReason::CorruptHistory => warn!(
                peer = %peer,
                based_on = %self.content.based_on,
                "peer history is missing links; overruling it"
            ),
            WeWinReason::SuccessorNewer => debug!(
                peer = %peer,
                version_key = %self.content.version_key,
                "competing successor sorts after ours; our write stands"
            ),
        }
    }

    async fn succeed(self) {
        debug!(
            version_key = %self.content.version_key,
            "put verified on all responding peers"
        );
        self.reporter.report_success().await;
    }

    async fn fail(self) {
        self.reporter
            .report_failure(
                self.data.as_ref(),
                &self.location_key,
                &self.content_key,
                self.content.version_key,
            )
            .await;
    }
}
