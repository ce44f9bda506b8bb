// ── Check-in submitter ──
//
// Assembles the final payload and performs the one-shot submission.
// While a call is in flight, re-invocation is suppressed rather than
// duplicated: exactly one CheckinRecord is ever created per user
// action.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{debug, warn};

use stayflow_api::CheckinClient;
use stayflow_api::types::CheckinRequestBody;

use crate::model::{CheckinRecord, CheckinRequest};

/// Failure of the final submission. All variants leave the wizard on
/// `ArrivalSchedule`; the same payload may be resubmitted.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A submission is already pending; this call was suppressed.
    #[error("a submission is already in flight")]
    InFlight,

    /// Arrival info has not passed its validator.
    #[error("arrival information incomplete")]
    Incomplete,

    /// The wizard is not on the `ArrivalSchedule` step.
    #[error("check-in is not ready for submission")]
    NotReady,

    /// The backend refused or the call failed; retryable.
    #[error("check-in submission failed: {message}")]
    Failed { message: String },
}

pub struct CheckinSubmitter {
    client: Arc<CheckinClient>,
    in_flight: AtomicBool,
}

impl CheckinSubmitter {
    pub fn new(client: Arc<CheckinClient>) -> Self {
        Self {
            client,
            in_flight: AtomicBool::new(false),
        }
    }

    /// `true` while a submission is pending (callers disable the
    /// submit action on this).
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Perform the one-shot submission.
    ///
    /// A second call while the first is pending returns
    /// [`SubmitError::InFlight`] without touching the backend.
    pub async fn submit(&self, request: &CheckinRequest) -> Result<CheckinRecord, SubmitError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("submission already in flight, suppressing");
            return Err(SubmitError::InFlight);
        }

        let body = to_wire(request);
        let result = self.client.submit_checkin(&body).await;
        self.in_flight.store(false, Ordering::SeqCst);

        match result {
            Ok(record) => {
                debug!(booking_code = %record.booking_code, "check-in created");
                Ok(record.into())
            }
            Err(e) => {
                warn!(error = %e, "check-in submission failed");
                Err(SubmitError::Failed {
                    message: e.to_string(),
                })
            }
        }
    }
}

fn to_wire(request: &CheckinRequest) -> CheckinRequestBody {
    CheckinRequestBody {
        booking_code: request.booking_code.clone(),
        arrival_time: request.arrival_time.format("%H:%M").to_string(),
        coming_from: request.coming_from.clone(),
        next_destination: request.next_destination.clone(),
        checkin_date: request.checkin_date,
        checkout_date: request.checkout_date,
        email: request.email.clone(),
    }
}
