use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/clinics", get(handlers::clinics::list_clinics))
        .route("/api/clinics/search", get(handlers::clinics::search_clinics))
        .route("/api/clinics/nearby", get(handlers::clinics::nearby_clinics))
        .route("/api/clinics/stats", get(handlers::clinics::clinic_stats))
        .route("/api/clinics/:id", get(handlers::clinics::get_clinic))
        .route("/api/clinics/:id/services", get(handlers::clinics::clinic_services))
        .route("/api/services", get(handlers::clinics::list_services))
}
