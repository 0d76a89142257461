use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sorriso_api::build_router;
use sorriso_core::models::appointment::{Appointment, AppointmentEventKind};

use crate::test_utils::{TestContext, create_test_db};

fn booking() -> Value {
    json!({
        "name": "Maria Souza",
        "phone": "(35) 99891-3803",
        "email": null,
        "clinic": "campo-belo-mg",
        "service": "Limpeza Dental",
        "date": "2024-06-03",
        "time": "09:30",
        "notes": null,
        "source": null,
        "status": null,
        "webhook_session_id": null
    })
}

fn error_of(body: &Value) -> &str {
    body["error"].as_str().unwrap()
}

#[tokio::test]
async fn invalid_booking_lists_every_bad_field() {
    // No sender expectations: a refused booking sends nothing
    let server = TestContext::new().server();

    let mut payload = booking();
    payload["name"] = json!("M");
    payload["phone"] = json!("123");
    payload["time"] = json!("9h");

    let response = server.post("/api/appointments").json(&payload).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    let message = error_of(&body);
    assert!(message.contains("name:"));
    assert!(message.contains("phone:"));
    assert!(message.contains("time:"));
}

#[tokio::test]
async fn sunday_booking_is_refused() {
    let server = TestContext::new().server();

    let mut payload = booking();
    payload["date"] = json!("2024-06-02");

    let response = server.post("/api/appointments").json(&payload).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(error_of(&response.json()).contains("not an available slot"));
}

#[tokio::test]
async fn off_grid_time_is_refused() {
    let server = TestContext::new().server();

    let mut payload = booking();
    payload["time"] = json!("09:15");

    server
        .post("/api/appointments")
        .json(&payload)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_dashboard_window_is_a_bad_request() {
    let server = TestContext::new().server();

    server
        .get("/api/appointments")
        .add_query_param("window", "fortnight")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_appointment_id_is_rejected() {
    let server = TestContext::new().server();

    let response = server.get("/api/appointments/not-a-uuid").await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn booking_is_stored_announced_and_confirmed() {
    let pool = create_test_db().await;

    let mut ctx = TestContext::new();
    ctx.settings.clinic_notification_phone = Some("+5535999990000".to_string());
    ctx.sender
        .expect_send()
        .withf(|m| m.phone == "+5535998913803" && m.session_id.starts_with("booking_") && !m.session_id.ends_with("_clinic"))
        .times(1)
        .returning(|_| Ok(()));
    ctx.sender
        .expect_send()
        .withf(|m| m.phone == "+5535999990000" && m.session_id.ends_with("_clinic"))
        .times(1)
        .returning(|_| Ok(()));

    let state = ctx.build_state_with(pool.clone());
    let mut events = state.events.subscribe();
    let server = TestServer::new(build_router(state)).unwrap();

    let mut payload = booking();
    payload["date"] = json!("2030-01-07");

    let response = server.post("/api/appointments").json(&payload).await;
    response.assert_status(StatusCode::CREATED);

    let created: Appointment = response.json();
    assert_eq!(created.phone, "+5535998913803");
    assert!(created.clinic.ends_with("Campo Belo, MG"));

    let event = events.try_recv().unwrap();
    assert_eq!(event.kind, AppointmentEventKind::Created);
    assert_eq!(event.appointment_id, created.id);

    sorriso_db::repositories::appointment::delete_appointment(&pool, created.id)
        .await
        .unwrap();
}
