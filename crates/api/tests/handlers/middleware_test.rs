use axum::http::StatusCode;
use rstest::rstest;
use sorriso_api::middleware::{auth, error_handling::map_error};
use sorriso_core::errors::ClinicError;

#[rstest]
#[case(ClinicError::NotFound("missing".to_string()), StatusCode::NOT_FOUND)]
#[case(ClinicError::Validation("bad".to_string()), StatusCode::BAD_REQUEST)]
#[case(ClinicError::Authentication("who".to_string()), StatusCode::UNAUTHORIZED)]
#[case(ClinicError::Authorization("no".to_string()), StatusCode::FORBIDDEN)]
#[case(ClinicError::Database(eyre::eyre!("db down")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(ClinicError::Upstream("webhook down".to_string()), StatusCode::BAD_GATEWAY)]
#[case(ClinicError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
fn errors_map_to_status_codes(#[case] error: ClinicError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn error_body_is_json() {
    let response = map_error(ClinicError::NotFound("Appointment 1".to_string()));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "Resource not found: Appointment 1");
}

#[test]
fn staff_passwords_round_trip_through_argon2() {
    let hash = auth::hash_password("sorriso-2024").unwrap();

    assert!(auth::verify_password(&hash, "sorriso-2024").unwrap());
    assert!(!auth::verify_password(&hash, "sorriso-2025").unwrap());
}
