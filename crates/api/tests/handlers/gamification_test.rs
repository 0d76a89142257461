use axum::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};
use sorriso_core::gamification::MAX_POINTS_PER_AWARD;

use crate::test_utils::TestContext;

#[rstest]
#[case(0)]
#[case(MAX_POINTS_PER_AWARD as u64 + 1)]
#[case(i32::MAX as u64 + 1)]
#[case(u32::MAX as u64)]
#[tokio::test]
async fn out_of_range_points_are_refused(#[case] points: u64) {
    let server = TestContext::new().server();

    let response = server
        .post("/api/gamification/patient-1/points")
        .json(&json!({ "points": points, "description": "Consulta realizada", "kind": "appointment" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("points"));
}

#[tokio::test]
async fn points_need_a_description() {
    TestContext::new()
        .server()
        .post("/api/gamification/patient-1/points")
        .json(&json!({ "points": 50, "description": "  ", "kind": "challenge" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
