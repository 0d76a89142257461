use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/functions/get-xai-key", get(handlers::functions::get_xai_key))
        .route("/functions/send-password-reset", post(handlers::functions::send_password_reset))
        .route("/functions/process-reminders", post(handlers::functions::process_reminders))
}
