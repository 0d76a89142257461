use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/gamification/:user_id", get(handlers::gamification::get_gamification))
        .route("/api/gamification/:user_id/points", post(handlers::gamification::add_points))
        .route("/api/gamification/:user_id/streak", post(handlers::gamification::update_streak))
        .route(
            "/api/gamification/:user_id/badges",
            get(handlers::gamification::list_badges).post(handlers::gamification::award_badge),
        )
}
