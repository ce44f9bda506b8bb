// ── Wire → domain conversions ──
//
// Translates `stayflow-api` response types into the clean domain model.
// Unknown wire values surface as errors here, never deeper in the flow.

use stayflow_api::types::{
    AssetStatusResponse, CheckinRecordResponse, DocumentTypeResponse, ReservationResponse,
};

use crate::error::CoreError;
use crate::model::{
    CheckinRecord, DocumentRequirements, DocumentSide, DocumentType, Reservation,
    ValidationStatus,
};

impl From<ReservationResponse> for Reservation {
    fn from(wire: ReservationResponse) -> Self {
        Self {
            booking_code: wire.booking_code,
            property_name: wire.property_name,
            checkin_date: wire.checkin_date,
            checkout_date: wire.checkout_date,
            guest_email: wire.guest_email,
        }
    }
}

impl From<CheckinRecordResponse> for CheckinRecord {
    fn from(wire: CheckinRecordResponse) -> Self {
        Self {
            id: wire.id,
            booking_code: wire.booking_code,
            created_at: wire.created_at,
        }
    }
}

fn side_from_role(role: &str) -> Option<DocumentSide> {
    match role {
        "front" => Some(DocumentSide::Front),
        "back" => Some(DocumentSide::Back),
        _ => None,
    }
}

/// Resolve the capture plan from the document-type catalog.
///
/// The catalog must carry a front entry; a back entry is only consulted
/// when the front declares `requiresBackSide`.
pub fn document_requirements(
    catalog: Vec<DocumentTypeResponse>,
) -> Result<DocumentRequirements, CoreError> {
    let mut front = None;
    let mut back = None;

    for entry in catalog {
        let Some(side) = side_from_role(&entry.side_role) else {
            continue;
        };
        let doc = DocumentType {
            side,
            type_id: entry.type_id,
            requires_back: entry.requires_back_side,
        };
        match side {
            DocumentSide::Front => front = Some(doc),
            DocumentSide::Back => back = Some(doc),
        }
    }

    let front = front.ok_or_else(|| CoreError::SetupIncomplete {
        message: "document-type catalog has no front entry".into(),
    })?;

    if front.requires_back && back.is_none() {
        return Err(CoreError::SetupIncomplete {
            message: "document type requires a back side but the catalog has no back entry".into(),
        });
    }

    Ok(DocumentRequirements { front, back })
}

/// Parse a wire validation status. `None` for statuses this client
/// does not know, which the poller treats as terminal rejection.
pub fn validation_status(wire: &AssetStatusResponse) -> Option<ValidationStatus> {
    match wire.status.as_str() {
        "Pending" => Some(ValidationStatus::Pending),
        "Processing" => Some(ValidationStatus::Processing),
        "Validated" => Some(ValidationStatus::Validated),
        "Rejected" => Some(ValidationStatus::Rejected),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: &str, type_id: &str, requires_back: bool) -> DocumentTypeResponse {
        DocumentTypeResponse {
            side_role: role.into(),
            type_id: type_id.into(),
            requires_back_side: requires_back,
        }
    }

    #[test]
    fn single_sided_catalog_resolves_without_back() {
        let req =
            document_requirements(vec![entry("front", "passport-front", false)]).unwrap();
        assert!(!req.requires_back());
        assert_eq!(req.type_id_for(DocumentSide::Front), Some("passport-front"));
        assert_eq!(req.type_id_for(DocumentSide::Back), None);
    }

    #[test]
    fn double_sided_catalog_needs_back_entry() {
        let err = document_requirements(vec![entry("front", "id-front", true)]).unwrap_err();
        assert!(matches!(err, CoreError::SetupIncomplete { .. }));

        let req = document_requirements(vec![
            entry("front", "id-front", true),
            entry("back", "id-back", true),
        ])
        .unwrap();
        assert!(req.requires_back());
        assert_eq!(req.type_id_for(DocumentSide::Back), Some("id-back"));
    }

    #[test]
    fn missing_front_entry_is_an_error() {
        let err = document_requirements(vec![entry("back", "id-back", false)]).unwrap_err();
        assert!(matches!(err, CoreError::SetupIncomplete { .. }));
    }
}
