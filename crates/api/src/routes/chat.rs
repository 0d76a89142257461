use axum::{Router, routing::post};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/chat/completions", post(handlers::chat::completions))
        .route("/api/chat/webhook-response", post(handlers::chat::webhook_response))
}
