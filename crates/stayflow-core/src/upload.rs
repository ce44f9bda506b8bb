// ── Upload coordinator ──
//
// Uploads a captured file, triggers validation polling for the front
// side, and reports success/failure. Escalation of repeated upload
// failures is decided here and surfaces as a recovery affordance the
// step machine requests from the UI.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tracing::{debug, warn};

use stayflow_api::CheckinClient;

use crate::config::PollConfig;
use crate::error::{CaptureError, RecoveryAction};
use crate::model::{CaptureSlot, DocumentSide};
use crate::poller::{DocumentValidationPoller, PollError};
use crate::store::IdentityDocumentStore;
use crate::wizard::WizardEvent;

pub struct UploadCoordinator {
    client: Arc<CheckinClient>,
    store: Arc<IdentityDocumentStore>,
    poller: DocumentValidationPoller,
    poll_config: PollConfig,
    /// One upload in flight per side: a new capture for a side waits
    /// for the prior attempt (including its validation loop) to settle.
    side_locks: [Mutex<()>; 2],
    events: broadcast::Sender<WizardEvent>,
}

impl UploadCoordinator {
    pub fn new(
        client: Arc<CheckinClient>,
        store: Arc<IdentityDocumentStore>,
        poll_config: PollConfig,
        events: broadcast::Sender<WizardEvent>,
    ) -> Self {
        Self {
            client,
            store,
            poller: DocumentValidationPoller::new(poll_config.clone()),
            poll_config,
            side_locks: [Mutex::new(()), Mutex::new(())],
            events,
        }
    }

    /// Upload one side's capture and, for the front, await its
    /// validation job.
    ///
    /// Back-side success needs no validation -- it is done as soon as
    /// the transfer completes. Whatever the outcome, the side's
    /// uploading flag is cleared and a profile refresh is requested so
    /// updated asset state becomes visible to the host.
    pub async fn submit_capture(
        &self,
        side: DocumentSide,
        slot: &CaptureSlot,
        type_id: &str,
    ) -> Result<(), CaptureError> {
        let _guard = self.side_locks[side.index()].lock().await;

        self.store.set_uploading(side, true);
        let result = self.run_attempt(side, slot, type_id).await;
        self.store.set_uploading(side, false);

        let _ = self.events.send(WizardEvent::ProfileRefreshRequested);

        result
    }

    async fn run_attempt(
        &self,
        side: DocumentSide,
        slot: &CaptureSlot,
        type_id: &str,
    ) -> Result<(), CaptureError> {
        debug!(%side, type_id, source = %slot.source, "uploading capture");

        let receipt = match self.client.upload_asset(type_id, &slot.file_path).await {
            Ok(receipt) => receipt,
            Err(source) => {
                let failures = self.store.record_failure(side);
                // First failure per side is recoverable; from the
                // second on the counter never resets, so the harsher
                // affordance sticks for the rest of the session.
                let action = if failures <= 1 {
                    RecoveryAction::RetryUpload
                } else {
                    RecoveryAction::TechnicalError
                };
                warn!(%side, failures, error = %source, "capture upload failed");
                return Err(CaptureError::Upload { action, source });
            }
        };

        if side == DocumentSide::Back {
            debug!("back capture stored, no validation required");
            return Ok(());
        }

        self.store
            .begin_front_job(receipt.job_key.clone(), self.poll_config.max_attempts);

        match self
            .poller
            .poll(&self.client, &self.store, &receipt.job_key)
            .await
        {
            Ok(()) => Ok(()),
            Err(PollError::Rejected { message }) => {
                // The upload itself succeeded: an explicit rejection is
                // a fresh recapture, not an escalation step.
                Err(CaptureError::Rejected { message })
            }
            Err(PollError::Timeout) => Err(CaptureError::ValidationTimeout),
        }
    }
}
