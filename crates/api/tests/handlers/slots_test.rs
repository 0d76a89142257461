use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use sorriso_api::build_router;
use sorriso_core::models::appointment::{AppointmentStatus, NewAppointment};
use uuid::Uuid;

use crate::test_utils::{TestContext, create_test_db};

#[rstest]
#[case("2024-06-03", 23, false, false)]
#[case("2024-06-01", 11, true, false)]
#[case("2024-06-02", 0, false, true)]
#[tokio::test]
async fn slots_follow_the_weekday_table(
    #[case] date: &str,
    #[case] count: usize,
    #[case] is_weekend: bool,
    #[case] is_closed: bool,
) {
    let server = TestContext::new().server();

    let response = server.get("/api/slots").add_query_param("date", date).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["time_slots"].as_array().unwrap().len(), count);
    assert_eq!(body["is_weekend"], is_weekend);
    assert_eq!(body["is_closed"], is_closed);
}

#[tokio::test]
async fn weekday_slots_run_from_eight_to_seven() {
    let server = TestContext::new().server();

    let body: Value = server
        .get("/api/slots")
        .add_query_param("date", "2024-06-04")
        .await
        .json();
    let slots = body["time_slots"].as_array().unwrap();
    assert_eq!(slots.first().unwrap(), "08:00");
    assert_eq!(slots.last().unwrap(), "19:00");
}

#[tokio::test]
async fn malformed_dates_are_rejected() {
    let server = TestContext::new().server();

    let response = server.get("/api/slots").add_query_param("date", "03/06/2024").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("YYYY-MM-DD"));
}

fn booked(clinic: &str, time: &str, status: AppointmentStatus) -> NewAppointment {
    NewAppointment {
        name: "Paciente Teste".to_string(),
        phone: "+5535998913803".to_string(),
        email: None,
        clinic: clinic.to_string(),
        service: "Avaliação".to_string(),
        date: NaiveDate::from_ymd_opt(2030, 1, 7).unwrap(),
        time: time.to_string(),
        status,
        notes: None,
        source: "pwa".to_string(),
        webhook_session_id: None,
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn clinic_filter_hides_taken_times() {
    let pool = create_test_db().await;
    let clinic = format!("Senhor Sorriso Teste {}", Uuid::new_v4());

    let taken = sorriso_db::repositories::appointment::create_appointment(
        &pool,
        &booked(&clinic, "10:00", AppointmentStatus::Confirmed),
    )
    .await
    .unwrap();
    let cancelled = sorriso_db::repositories::appointment::create_appointment(
        &pool,
        &booked(&clinic, "11:00", AppointmentStatus::Cancelled),
    )
    .await
    .unwrap();

    let state = TestContext::new().build_state_with(pool.clone());
    let server = TestServer::new(build_router(state)).unwrap();

    let body: Value = server
        .get("/api/slots")
        .add_query_param("date", "2030-01-07")
        .add_query_param("clinic", &clinic)
        .await
        .json();
    let slots: Vec<&str> = body["time_slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();

    assert_eq!(slots.len(), 22);
    assert!(!slots.contains(&"10:00"));
    assert!(slots.contains(&"11:00"));

    for id in [taken.id, cancelled.id] {
        sorriso_db::repositories::appointment::delete_appointment(&pool, id)
            .await
            .unwrap();
    }
}
