// Integration tests for `CheckinClient` using wiremock.

use std::io::Write;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stayflow_api::types::{CheckinRequestBody, ProfilePatch};
use stayflow_api::{CheckinClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CheckinClient) {
    let server = MockServer::start().await;
    let base = server.uri().parse().unwrap();
    let client = CheckinClient::with_client(reqwest::Client::new(), base);
    (server, client)
}

// ── Reservations ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_reservation() {
    let (server, client) = setup().await;

    let body = json!({
        "bookingCode": "BK-1042",
        "propertyName": "Casa Miramar",
        "checkinDate": "2025-06-01",
        "checkoutDate": "2025-06-05",
        "guestEmail": "ana@example.com"
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/BK-1042"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let reservation = client.get_reservation("BK-1042").await.unwrap().unwrap();

    assert_eq!(reservation.booking_code, "BK-1042");
    assert_eq!(reservation.property_name, "Casa Miramar");
    assert_eq!(reservation.guest_email.as_deref(), Some("ana@example.com"));
}

#[tokio::test]
async fn test_get_reservation_not_found_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/NOPE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let reservation = client.get_reservation("NOPE").await.unwrap();
    assert!(reservation.is_none());
}

// ── Document types & assets ─────────────────────────────────────────

#[tokio::test]
async fn test_document_type_catalog() {
    let (server, client) = setup().await;

    let body = json!([
        { "sideRole": "front", "typeId": "passport-front", "requiresBackSide": false },
        { "sideRole": "back", "typeId": "passport-back", "requiresBackSide": false },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/v1/document-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let catalog = client.document_type_catalog().await.unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].side_role, "front");
    assert_eq!(catalog[0].type_id, "passport-front");
    assert!(!catalog[0].requires_back_side);
}

#[tokio::test]
async fn test_upload_asset_returns_job_key() {
    let (server, client) = setup().await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"jpeg bytes").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/assets"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "jobKey": "job-77" })))
        .mount(&server)
        .await;

    let receipt = client
        .upload_asset("id-card-front", file.path())
        .await
        .unwrap();

    assert_eq!(receipt.job_key, "job-77");
}

#[tokio::test]
async fn test_asset_status_rejected_carries_message() {
    let (server, client) = setup().await;

    let body = json!({
        "status": "Rejected",
        "validationErrorMessage": "blurry image"
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/assets/job-77/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let status = client.asset_status("job-77").await.unwrap();

    assert_eq!(status.status, "Rejected");
    assert_eq!(status.validation_error_message.as_deref(), Some("blurry image"));
}

// ── Profile ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_patch_profile_sends_only_set_fields() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/profile"))
        .and(wiremock::matchers::body_json(json!({ "address": "12 Quay St" })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let patch = ProfilePatch {
        address: Some("12 Quay St".into()),
        ..ProfilePatch::default()
    };

    client.patch_profile(&patch).await.unwrap();
}

// ── Check-in ────────────────────────────────────────────────────────

fn sample_checkin() -> CheckinRequestBody {
    CheckinRequestBody {
        booking_code: "BK-1042".into(),
        arrival_time: "15:30".into(),
        coming_from: "Lisbon".into(),
        next_destination: "Porto".into(),
        checkin_date: "2025-06-01".parse().unwrap(),
        checkout_date: "2025-06-05".parse().unwrap(),
        email: "ana@example.com".into(),
    }
}

#[tokio::test]
async fn test_submit_checkin() {
    let (server, client) = setup().await;

    let body = json!({
        "id": "9e107d9d-372b-4ccc-8a6d-cb1a2f3a4b5c",
        "bookingCode": "BK-1042",
        "createdAt": "2025-06-01T14:02:00Z"
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/checkins"))
        .respond_with(ResponseTemplate::new(201).set_body_json(&body))
        .mount(&server)
        .await;

    let record = client.submit_checkin(&sample_checkin()).await.unwrap();
    assert_eq!(record.booking_code, "BK-1042");
}

#[tokio::test]
async fn test_error_envelope_unwrapped() {
    let (server, client) = setup().await;

    let body = json!({
        "error": { "code": "checkin.window-closed", "message": "check-in window has closed" }
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/checkins"))
        .respond_with(ResponseTemplate::new(422).set_body_json(&body))
        .mount(&server)
        .await;

    let err = client.submit_checkin(&sample_checkin()).await.unwrap_err();

    match err {
        Error::Api { message, code, status } => {
            assert_eq!(message, "check-in window has closed");
            assert_eq!(code.as_deref(), Some("checkin.window-closed"));
            assert_eq!(status, 422);
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_preview_survives_multibyte_bodies() {
    let (server, client) = setup().await;

    // No envelope, and a multibyte character straddling byte 200 of the
    // body; the preview must truncate on a char boundary, not panic.
    let body = format!("{}é and more detail after the cutoff", "x".repeat(199));

    Mock::given(method("GET"))
        .and(path("/api/v1/document-types"))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .mount(&server)
        .await;

    let err = client.document_type_catalog().await.unwrap_err();

    match err {
        Error::Api { message, status, .. } => {
            assert_eq!(status, 500);
            assert!(message.starts_with("HTTP 500"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/document-types"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.document_type_catalog().await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
}
