use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/templates",
            get(handlers::templates::list_templates).post(handlers::templates::create_template),
        )
        .route("/api/templates/reminders", post(handlers::templates::send_bulk_reminders))
        .route(
            "/api/templates/:id",
            get(handlers::templates::get_template)
                .put(handlers::templates::update_template)
                .delete(handlers::templates::delete_template),
        )
        .route("/api/templates/:id/preview", post(handlers::templates::preview_template))
        .route("/api/templates/:id/send", post(handlers::templates::send_template))
}
