// Guest profile endpoints
//
// Fire-and-forget side effects: the wizard pushes materially changed
// personal fields back to the external profile store, and the email
// separately once it has passed the debounced format check.

use tracing::debug;

use crate::client::CheckinClient;
use crate::error::Error;
use crate::types::ProfilePatch;

impl CheckinClient {
    /// Push changed personal-info fields to the guest profile.
    ///
    /// `PATCH /api/v1/profile`
    ///
    /// Only the fields set on `patch` are sent.
    pub async fn patch_profile(&self, patch: &ProfilePatch) -> Result<(), Error> {
        let url = self.api_url("profile")?;
        debug!("patching guest profile");
        self.patch_empty(url, patch).await
    }

    /// Update the guest's email address.
    ///
    /// `POST /api/v1/profile/email`
    ///
    /// Fired only for an address that passed the debounce + format check
    /// and differs from the known one.
    pub async fn update_email(&self, address: &str) -> Result<(), Error> {
        let url = self.api_url("profile/email")?;
        debug!("updating guest email");
        self.post_empty(url, &serde_json::json!({ "email": address }))
            .await
    }
}
