use axum::http::StatusCode;
use mockall::predicate::{always, eq};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sorriso_core::models::chat::{CompletionResponse, WebhookProcessResponse};
use sorriso_integrations::{
    IntegrationError,
    ai::{AiProvider, PROVIDER_CONFIG, PROVIDER_FIELD},
    flags::StaticFlags,
};

use crate::test_utils::TestContext;

#[tokio::test]
async fn completion_uses_the_default_provider() {
    let mut ctx = TestContext::new();
    ctx.completions
        .expect_complete()
        .with(eq(AiProvider::Groq), eq("Quais serviços vocês oferecem?"))
        .times(1)
        .returning(|_, _| Ok("Oferecemos limpeza, clareamento e implantes.".to_string()));

    let response = ctx
        .server()
        .post("/api/chat/completions")
        .json(&json!({ "prompt": "  Quais serviços vocês oferecem? ", "user_id": "patient-1" }))
        .await;
    response.assert_status_ok();

    let body: CompletionResponse = response.json();
    assert_eq!(body.provider, "groq");
    assert_eq!(body.text, "Oferecemos limpeza, clareamento e implantes.");
}

#[tokio::test]
async fn flag_value_switches_the_provider() {
    let mut ctx = TestContext::new();
    ctx.flags = StaticFlags::default().with_value(PROVIDER_CONFIG, PROVIDER_FIELD, json!("xai"));
    ctx.completions
        .expect_complete()
        .with(eq(AiProvider::Xai), always())
        .returning(|_, _| Ok("Olá!".to_string()));

    let body: CompletionResponse = ctx
        .server()
        .post("/api/chat/completions")
        .json(&json!({ "prompt": "Oi", "user_id": "" }))
        .await
        .json();
    assert_eq!(body.provider, "xai");
}

#[tokio::test]
async fn provider_failure_is_a_bad_gateway() {
    let mut ctx = TestContext::new();
    ctx.completions
        .expect_complete()
        .returning(|_, _| Err(IntegrationError::Api { status: 429, message: "rate limited".to_string() }));

    let response = ctx
        .server()
        .post("/api/chat/completions")
        .json(&json!({ "prompt": "Oi", "user_id": "patient-1" }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("rate limited"));
}

#[tokio::test]
async fn empty_prompt_never_reaches_the_provider() {
    let ctx = TestContext::new();

    ctx.server()
        .post("/api/chat/completions")
        .json(&json!({ "prompt": "   ", "user_id": "patient-1" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn plain_chat_output_creates_nothing() {
    let server = TestContext::new().server();

    let response = server
        .post("/api/chat/webhook-response")
        .json(&json!({
            "output": "Olá! Como posso ajudar você hoje?",
            "sessionId": "session_1",
            "userPhone": "5535998913803"
        }))
        .await;
    response.assert_status_ok();

    let body: WebhookProcessResponse = response.json();
    assert!(!body.parsed.is_appointment);
    assert!(body.created.is_none());
}

#[tokio::test]
async fn confirmation_without_date_creates_nothing() {
    let server = TestContext::new().server();

    let body: WebhookProcessResponse = server
        .post("/api/chat/webhook-response")
        .json(&json!({ "output": "Seu agendamento confirmado! Até breve." }))
        .await
        .json();

    assert!(body.parsed.is_appointment);
    assert!(body.created.is_none());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn rambling_confirmation_still_books_the_patient() {
    let pool = crate::test_utils::create_test_db().await;
    let state = TestContext::new().build_state_with(pool.clone());
    let mut events = state.events.subscribe();
    let server = axum_test::TestServer::new(sorriso_api::build_router(state)).unwrap();

    let output = "Consulta agendada para Ana Souza no dia 12/03/2030 às 10:00 na unidade Campo Belo e lembramos que é importante chegar com quinze minutos de antecedência para o seu atendimento";

    let response = server
        .post("/api/chat/webhook-response")
        .json(&json!({ "output": output, "sessionId": "session_rambling", "userPhone": "5535998913803" }))
        .await;
    response.assert_status_ok();

    let body: WebhookProcessResponse = response.json();
    let created = body.created.unwrap();
    assert_eq!(created.name, "Ana Souza");
    assert_eq!(created.time, "10:00");
    assert_eq!(created.source, "webhook");
    assert_eq!(events.try_recv().unwrap().appointment_id, created.id);

    sorriso_db::repositories::appointment::delete_appointment(&pool, created.id)
        .await
        .unwrap();
}
