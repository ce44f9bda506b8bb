// Identity document endpoints
//
// Covers the document-type catalog, the asset upload, and the
// validation-job status check the poller drives.

use std::path::Path;

use tracing::debug;

use crate::client::CheckinClient;
use crate::error::Error;
use crate::types::{AssetStatusResponse, DocumentTypeResponse, UploadReceipt};

impl CheckinClient {
    /// Fetch the document-type catalog.
    ///
    /// `GET /api/v1/document-types`
    ///
    /// Consumed once per wizard instance; the front entry determines
    /// whether the flow is single- or double-sided.
    pub async fn document_type_catalog(&self) -> Result<Vec<DocumentTypeResponse>, Error> {
        let url = self.api_url("document-types")?;
        debug!("fetching document type catalog");
        self.get(url).await
    }

    /// Upload a captured document image.
    ///
    /// `POST /api/v1/assets` (multipart: `documentTypeId` + `file`)
    ///
    /// The backend spawns a validation job for the asset and returns its
    /// key. One call per capture.
    pub async fn upload_asset(
        &self,
        type_id: &str,
        file_path: &Path,
    ) -> Result<UploadReceipt, Error> {
        let url = self.api_url("assets")?;
        debug!(type_id, path = %file_path.display(), "uploading document asset");

        let bytes = tokio::fs::read(file_path).await?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "capture.jpg".into());
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .text("documentTypeId", type_id.to_owned())
            .part("file", part);

        self.post_multipart(url, form).await
    }

    /// Check the status of a validation job.
    ///
    /// `GET /api/v1/assets/{jobKey}/status`
    pub async fn asset_status(&self, job_key: &str) -> Result<AssetStatusResponse, Error> {
        let url = self.api_url(&format!("assets/{job_key}/status"))?;
        debug!(job_key, "checking asset validation status");
        self.get(url).await
    }
}
