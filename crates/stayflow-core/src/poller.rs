// ── Document validation poller ──
//
// Drives repeated status checks against the remote validation job until
// a terminal state or timeout. This is a self-rescheduling loop, not a
// fixed-interval timer: each round is issued only after the previous
// response arrived, so there is never more than one in-flight status
// request per job.

use thiserror::Error;
use tracing::{debug, warn};

use stayflow_api::CheckinClient;

use crate::config::PollConfig;
use crate::convert::validation_status;
use crate::model::ValidationStatus;
use crate::store::IdentityDocumentStore;

/// Terminal failure of one validation job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// The server explicitly rejected the document; the message is
    /// surfaced verbatim.
    #[error("{message}")]
    Rejected { message: String },

    /// Polling exhausted its attempts without a terminal server
    /// response. The document's actual status is unknown, not rejected.
    #[error("validation polling timed out")]
    Timeout,
}

/// Polls a validation job to completion with attempt-scaled backoff.
pub struct DocumentValidationPoller {
    config: PollConfig,
}

impl DocumentValidationPoller {
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// Poll `job_key` until it settles.
    ///
    /// Each non-terminal round is recorded on the store's job snapshot
    /// so the UI can show progress. A failed status request counts as a
    /// round and is retried -- an unreachable service resolves as
    /// [`PollError::Timeout`], never as a rejection and never by
    /// hanging.
    pub async fn poll(
        &self,
        client: &CheckinClient,
        store: &IdentityDocumentStore,
        job_key: &str,
    ) -> Result<(), PollError> {
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            let observed = match client.asset_status(job_key).await {
                Ok(response) => match validation_status(&response) {
                    Some(ValidationStatus::Validated) => {
                        debug!(job_key, attempts, "document validated");
                        store.update_front_job(job_key, attempts, ValidationStatus::Validated);
                        return Ok(());
                    }
                    Some(ValidationStatus::Rejected) | None => {
                        let message = response
                            .validation_error_message
                            .unwrap_or_else(|| format!("document rejected ({})", response.status));
                        warn!(job_key, attempts, %message, "document rejected");
                        store.update_front_job(job_key, attempts, ValidationStatus::Rejected);
                        return Err(PollError::Rejected { message });
                    }
                    Some(status) => status,
                },
                Err(e) => {
                    // Status unknown, not rejected: keep polling.
                    warn!(job_key, attempts, error = %e, "status check failed");
                    ValidationStatus::Pending
                }
            };

            store.update_front_job(job_key, attempts, observed);

            if attempts >= self.config.max_attempts {
                warn!(job_key, attempts, "validation polling exhausted");
                return Err(PollError::Timeout);
            }

            tokio::time::sleep(self.config.delay_for_attempt(attempts)).await;
        }
    }
}
