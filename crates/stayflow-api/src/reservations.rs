// Reservation endpoints
//
// Consumed once at wizard start to resolve the booking the guest is
// checking in for.

use tracing::debug;

use crate::client::CheckinClient;
use crate::error::Error;
use crate::types::ReservationResponse;

impl CheckinClient {
    /// Look up a reservation by booking code.
    ///
    /// `GET /api/v1/reservations/{code}`
    ///
    /// Returns `None` when the backend reports the code as unknown.
    pub async fn get_reservation(&self, code: &str) -> Result<Option<ReservationResponse>, Error> {
        let url = self.api_url(&format!("reservations/{code}"))?;
        debug!(code, "fetching reservation");
        self.get_optional(url).await
    }
}
