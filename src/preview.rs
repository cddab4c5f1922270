//! Campaign readiness orchestration.
//!
//! Makes a campaign's rendered proof available with the minimum necessary
//! server-side advancement steps (processing, proof generation), at most one
//! advancement sequence per activation. The campaign's true state is always
//! re-derived from the server; this module holds no authoritative state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::debug;

use crate::api::{ApiError, CampaignClient, CampaignStatus, PreviewResponse, Readiness};

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("{}", .0.message())]
    Api(#[from] ApiError),

    /// The server's `status` string and `can_preview` flag contradict each
    /// other. Neither is trusted; the caller decides how to recover.
    #[error("server reported status '{status}' with can_preview={can_preview}, which disagree")]
    InconsistentState {
        status: CampaignStatus,
        can_preview: bool,
    },

    /// A second advancement pass was requested on the same activation.
    #[error("preview advancement already attempted; refresh to regenerate")]
    AlreadyAdvanced,

    /// The activation was deactivated mid-sequence.
    #[error("preview loading aborted")]
    Aborted,
}

/// Per-activation token guarding the advancement sequence.
///
/// `try_begin_advancement` succeeds at most once per activation, so a
/// doubled entry point invocation cannot issue the non-idempotent processing
/// call twice. `abort` stops the sequence before its next step.
#[derive(Debug, Default)]
pub struct Activation {
    advanced: AtomicBool,
    aborted: AtomicBool,
}

impl Activation {
    pub fn try_begin_advancement(&self) -> bool {
        !self.advanced.swap(true, Ordering::SeqCst)
    }

    /// Re-arm the guard after a failed sequence so a user-triggered retry
    /// can advance again.
    pub fn clear_advancement(&self) {
        self.advanced.store(false, Ordering::SeqCst);
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// Drives a campaign to the point where its proof can be fetched.
pub struct PreviewOrchestrator<'a> {
    client: &'a CampaignClient,
    activation: Arc<Activation>,
}

impl<'a> PreviewOrchestrator<'a> {
    pub fn new(client: &'a CampaignClient) -> Self {
        Self {
            client,
            activation: Arc::new(Activation::default()),
        }
    }

    /// Handle for aborting this orchestrator's activation from elsewhere.
    pub fn activation(&self) -> Arc<Activation> {
        Arc::clone(&self.activation)
    }

    /// Fetch the rendered proof, advancing the campaign first if the server
    /// says it is not previewable yet.
    ///
    /// Steps run strictly in sequence: status check, optional processing,
    /// optional proof generation, fetch. At most one advancement sequence
    /// runs per activation; on failure the guard re-arms for a manual retry
    /// but automatic re-entry never happens.
    pub async fn ensure_preview(&self, campaign_id: &str) -> Result<PreviewResponse, PreviewError> {
        self.check_active()?;
        let status = self.client.status(campaign_id).await?;
        debug!(campaign_id, status = %status.status, can_preview = status.can_preview, "campaign status");

        match status.readiness() {
            Readiness::Previewable => {
                self.check_active()?;
                Ok(self.client.preview(campaign_id).await?)
            }
            Readiness::Inconsistent {
                status,
                can_preview,
            } => Err(PreviewError::InconsistentState {
                status,
                can_preview,
            }),
            Readiness::NeedsAdvancement(current) => self.advance(campaign_id, current).await,
        }
    }

    /// Regenerate the proof unconditionally, then fetch it. User-triggered;
    /// does not consult the advancement guard.
    pub async fn refresh(&self, campaign_id: &str) -> Result<PreviewResponse, PreviewError> {
        self.check_active()?;
        self.client.generate_proof(campaign_id).await?;
        self.check_active()?;
        Ok(self.client.preview(campaign_id).await?)
    }

    /// Run the advancement sequence under the one-shot guard. The guard
    /// re-arms only when the sequence fails; after a success it stays
    /// engaged for the rest of the activation, and subsequent calls take
    /// the direct fetch path because the server now reports the campaign
    /// previewable.
    async fn advance(
        &self,
        campaign_id: &str,
        current: CampaignStatus,
    ) -> Result<PreviewResponse, PreviewError> {
        if !self.activation.try_begin_advancement() {
            return Err(PreviewError::AlreadyAdvanced);
        }
        let result = self.advancement_steps(campaign_id, current).await;
        if result.is_err() {
            self.activation.clear_advancement();
        }
        result
    }

    async fn advancement_steps(
        &self,
        campaign_id: &str,
        current: CampaignStatus,
    ) -> Result<PreviewResponse, PreviewError> {
        if current == CampaignStatus::Uploaded {
            self.check_active()?;
            match self.client.process(campaign_id).await {
                Ok(_) => {}
                // "Already processed" is an acceptable terminal state for
                // this step, not a failure. Semantic dedup, not a retry.
                Err(err) if err.is_already_processed() => {
                    debug!(campaign_id, "processing already done, continuing");
                }
                Err(err) => return Err(err.into()),
            }
        }

        if current != CampaignStatus::Ready {
            self.check_active()?;
            self.client.generate_proof(campaign_id).await?;
        }

        self.check_active()?;
        Ok(self.client.preview(campaign_id).await?)
    }

    fn check_active(&self) -> Result<(), PreviewError> {
        if self.activation.is_aborted() {
            Err(PreviewError::Aborted)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancement_guard_is_one_shot() {
        let activation = Activation::default();
        assert!(activation.try_begin_advancement());
        assert!(!activation.try_begin_advancement());
    }

    #[test]
    fn advancement_guard_rearms_after_clear() {
        let activation = Activation::default();
        assert!(activation.try_begin_advancement());
        activation.clear_advancement();
        assert!(activation.try_begin_advancement());
    }

    #[test]
    fn abort_is_sticky() {
        let activation = Activation::default();
        assert!(!activation.is_aborted());
        activation.abort();
        assert!(activation.is_aborted());
        assert!(activation.is_aborted());
    }

    #[test]
    fn preview_error_uses_normalized_message() {
        let err = PreviewError::Api(ApiError::Status {
            status: 404,
            message: "Campaign not found".into(),
        });
        assert_eq!(err.to_string(), "Campaign not found");
    }
}
