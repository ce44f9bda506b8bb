//! Wire types for the stayflow check-in backend (v1).
//!
//! All types match the JSON bodies of `/api/v1/` endpoints. Field names
//! use camelCase via `#[serde(rename_all = "camelCase")]`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Reservations ─────────────────────────────────────────────────────

/// Reservation overview — from `GET /v1/reservations/{code}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub booking_code: String,
    pub property_name: String,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    /// Email on file for the booking, if the guest has one.
    pub guest_email: Option<String>,
}

// ── Identity documents ───────────────────────────────────────────────

/// One entry of the document-type catalog — from `GET /v1/document-types`.
///
/// The catalog is keyed by side role; the front entry declares whether
/// the document type also requires a back capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeResponse {
    /// `"front"` or `"back"`.
    pub side_role: String,
    pub type_id: String,
    pub requires_back_side: bool,
}

/// Receipt for an uploaded document image — from `POST /v1/assets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    /// Key of the server-side validation job spawned for this asset.
    pub job_key: String,
}

/// Validation job status — from `GET /v1/assets/{jobKey}/status`.
///
/// `status` is one of `Pending`, `Processing`, `Validated`, `Rejected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetStatusResponse {
    pub status: String,
    /// Server-supplied rejection reason; only present on `Rejected`.
    pub validation_error_message: Option<String>,
}

// ── Guest profile ────────────────────────────────────────────────────

/// Partial profile update — `PATCH /v1/profile`.
///
/// Only materially changed fields are serialized; the caller diffs
/// against the known profile before building this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ProfilePatch {
    /// `true` if no field would be serialized.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.gender.is_none()
            && self.birth_date.is_none()
            && self.address.is_none()
            && self.country.is_none()
    }
}

// ── Check-in ─────────────────────────────────────────────────────────

/// Final check-in submission — `POST /v1/checkins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRequestBody {
    pub booking_code: String,
    pub arrival_time: String,
    pub coming_from: String,
    pub next_destination: String,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub email: String,
}

/// Created check-in record — response of `POST /v1/checkins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRecordResponse {
    pub id: Uuid,
    pub booking_code: String,
    pub created_at: DateTime<Utc>,
}
