use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/profiles", post(handlers::profiles::create_profile))
        .route(
            "/api/profiles/:id",
            get(handlers::profiles::get_profile).put(handlers::profiles::update_profile),
        )
        .route(
            "/api/profiles/:id/theme",
            get(handlers::profiles::get_theme).put(handlers::profiles::update_theme),
        )
}
