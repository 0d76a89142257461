use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            get(handlers::appointments::list_appointments).post(handlers::appointments::create_appointment),
        )
        .route("/api/appointments/stats", get(handlers::appointments::appointment_stats))
        .route("/api/appointments/clinics", get(handlers::appointments::list_clinics))
        .route("/api/appointments/events", get(handlers::appointments::appointment_events))
        .route(
            "/api/appointments/:id",
            get(handlers::appointments::get_appointment).delete(handlers::appointments::delete_appointment),
        )
        .route("/api/appointments/:id/status", put(handlers::appointments::update_status))
        .route("/api/appointments/:id/can-review", get(handlers::reviews::can_review))
}
