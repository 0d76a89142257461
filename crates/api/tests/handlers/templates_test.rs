use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::TestContext;

fn paced_context() -> TestContext {
    let mut ctx = TestContext::new();
    ctx.settings.template_send_interval = Duration::from_millis(1000);
    ctx.settings.request_timeout = Duration::from_secs(30);
    ctx
}

#[tokio::test]
async fn bulk_reminders_beyond_the_timeout_are_refused_before_sending() {
    // No sender expectations: nobody may be messaged
    let server = paced_context().server();
    let ids: Vec<Uuid> = (0..40).map(|_| Uuid::new_v4()).collect();

    let response = server
        .post("/api/templates/reminders")
        .json(&json!({ "appointment_ids": ids, "category": "reminder" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("at most 25 recipients"));
}

#[tokio::test]
async fn template_send_beyond_the_timeout_is_refused() {
    let server = paced_context().server();
    let ids: Vec<Uuid> = (0..26).map(|_| Uuid::new_v4()).collect();

    server
        .post(&format!("/api/templates/{}/send", Uuid::new_v4()))
        .json(&json!({ "appointment_ids": ids }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_recipient_list_is_refused() {
    TestContext::new()
        .server()
        .post("/api/templates/reminders")
        .json(&json!({ "appointment_ids": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
