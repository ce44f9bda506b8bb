// Check-in submission endpoint

use tracing::debug;

use crate::client::CheckinClient;
use crate::error::Error;
use crate::types::{CheckinRecordResponse, CheckinRequestBody};

impl CheckinClient {
    /// Submit the final check-in request for a reservation.
    ///
    /// `POST /api/v1/checkins`
    ///
    /// One-shot from the orchestrator's point of view: the caller
    /// suppresses re-invocation while a call is pending.
    pub async fn submit_checkin(
        &self,
        body: &CheckinRequestBody,
    ) -> Result<CheckinRecordResponse, Error> {
        let url = self.api_url("checkins")?;
        debug!(booking_code = %body.booking_code, "submitting check-in");
        self.post(url, body).await
    }
}
