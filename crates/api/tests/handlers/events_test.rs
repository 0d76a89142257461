use std::time::Duration;

use axum::{
    Router,
    body::{Body, BodyDataStream},
    http::{Request, StatusCode, header},
};
use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use sorriso_api::build_router;
use sorriso_core::models::appointment::AppointmentEventKind;
use tokio::time::timeout;
use tower::ServiceExt;

use crate::test_utils::{TestContext, sample_appointment};

async fn subscribe(app: Router, user: Option<&str>) -> BodyDataStream {
    let uri = match user {
        Some(user) => format!("/api/appointments/events?user={}", user),
        None => "/api/appointments/events".to_string(),
    };
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    response.into_body().into_data_stream()
}

async fn next_frame(frames: &mut BodyDataStream, wait: Duration) -> Option<String> {
    let frame = timeout(wait, frames.next()).await.ok()??.unwrap();
    Some(String::from_utf8(frame.to_vec()).unwrap())
}

#[tokio::test]
async fn clinic_dashboard_only_sees_its_own_clinic() {
    let state = TestContext::new().build_state();
    let mut frames = subscribe(build_router(state.clone()), Some("formiga")).await;

    let elsewhere = sample_appointment("Senhor Sorriso Campo Belo - Campo Belo, MG");
    let formiga = sample_appointment("Senhor Sorriso Formiga - Formiga, MG");
    state.events.publish(AppointmentEventKind::Created, &elsewhere);
    state.events.publish(AppointmentEventKind::Updated, &formiga);

    let frame = next_frame(&mut frames, Duration::from_secs(2)).await.unwrap();
    assert!(frame.contains("event: updated"));
    assert!(frame.contains(&formiga.id.to_string()));
    assert!(!frame.contains(&elsewhere.id.to_string()));
}

#[tokio::test]
async fn unscoped_feed_streams_every_change_in_order() {
    let state = TestContext::new().build_state();
    let mut frames = subscribe(build_router(state.clone()), None).await;

    let appointment = sample_appointment("Senhor Sorriso Itapeva - Itapeva, SP");
    state.events.publish(AppointmentEventKind::Created, &appointment);
    state.events.publish(AppointmentEventKind::Deleted, &appointment);

    let created = next_frame(&mut frames, Duration::from_secs(2)).await.unwrap();
    let deleted = next_frame(&mut frames, Duration::from_secs(2)).await.unwrap();
    assert!(created.contains("event: created"));
    assert!(deleted.contains("event: deleted"));
    assert!(deleted.contains(&appointment.id.to_string()));
}

#[tokio::test]
async fn unknown_login_receives_nothing() {
    let state = TestContext::new().build_state();
    let mut frames = subscribe(build_router(state.clone()), Some("intruso")).await;

    state
        .events
        .publish(AppointmentEventKind::Created, &sample_appointment("Senhor Sorriso Formiga - Formiga, MG"));

    assert!(next_frame(&mut frames, Duration::from_millis(300)).await.is_none());
}
