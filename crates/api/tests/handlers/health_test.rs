use sorriso_api::routes::health::{HealthResponse, SERVICE_NAME, VersionResponse};

use crate::test_utils::TestContext;

#[tokio::test]
async fn health_reports_ok() {
    let server = TestContext::new().server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: HealthResponse = response.json();
    assert_eq!(body.status, "ok");
    assert_eq!(body.service, SERVICE_NAME);
}

#[tokio::test]
async fn version_matches_the_crate() {
    let server = TestContext::new().server();

    let body: VersionResponse = server.get("/version").await.json();
    assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
}
