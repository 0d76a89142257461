use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sorriso_api::handlers::functions::MISSING_XAI_KEY;
use sorriso_integrations::{IntegrationError, email::PASSWORD_RESET_SUBJECT};

use crate::test_utils::TestContext;

#[tokio::test]
async fn xai_key_is_returned_when_configured() {
    let mut ctx = TestContext::new();
    ctx.settings.xai_api_key = Some("xai-test-key".to_string());

    let response = ctx.server().get("/functions/get-xai-key").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "apiKey": "xai-test-key" }));
}

#[tokio::test]
async fn missing_xai_key_is_a_bad_request() {
    let response = TestContext::new().server().get("/functions/get-xai-key").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": MISSING_XAI_KEY }));
}

#[tokio::test]
async fn password_reset_sends_one_email() {
    let mut ctx = TestContext::new();
    ctx.mailer
        .expect_send()
        .withf(|email| {
            email.to == vec!["ana@example.com".to_string()]
                && email.subject == PASSWORD_RESET_SUBJECT
                && email.html.contains("https://app.example/reset?token=abc")
        })
        .times(1)
        .returning(|_| Ok(json!({ "id": "email_123" })));

    let response = ctx
        .server()
        .post("/functions/send-password-reset")
        .json(&json!({ "email": "ana@example.com", "resetUrl": "https://app.example/reset?token=abc" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["emailResponse"]["id"], "email_123");
}

#[tokio::test]
async fn password_reset_rejects_bad_email() {
    let ctx = TestContext::new();

    ctx.server()
        .post("/functions/send-password-reset")
        .json(&json!({ "email": "not-an-email", "resetUrl": "https://app.example/reset" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unconfigured_mailer_is_a_bad_gateway() {
    let mut ctx = TestContext::new();
    ctx.mailer
        .expect_send()
        .returning(|_| Err(IntegrationError::NotConfigured("RESEND_API_KEY")));

    ctx.server()
        .post("/functions/send-password-reset")
        .json(&json!({ "email": "ana@example.com", "resetUrl": "https://app.example/reset" }))
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn password_reset_rejects_script_links() {
    // No mailer expectation: any send would fail the test.
    let ctx = TestContext::new();

    let response = ctx
        .server()
        .post("/functions/send-password-reset")
        .json(&json!({ "email": "ana@example.com", "resetUrl": "javascript:alert(document.cookie)" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("resetUrl"));
}
