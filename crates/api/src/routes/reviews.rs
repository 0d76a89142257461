use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/reviews", post(handlers::reviews::create_review))
        .route("/api/clinics/:id/reviews", get(handlers::reviews::list_clinic_reviews))
        .route("/api/clinics/:id/reviews/stats", get(handlers::reviews::clinic_review_stats))
}
