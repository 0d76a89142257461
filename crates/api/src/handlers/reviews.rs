use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use sorriso_core::{
    errors::ClinicError,
    models::{
        appointment::Appointment,
        review::{CreateReviewRequest, Review, ReviewStats},
    },
    reviews, validation,
};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct CanReviewQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct CanReviewResponse {
    pub can_review: bool,
}

async fn review_context(pool: &PgPool, appointment_id: Uuid) -> Result<(Appointment, Vec<Review>), AppError> {
    let row = sorriso_db::repositories::appointment::get_appointment_by_id(pool, appointment_id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", appointment_id)))?;

    let existing = sorriso_db::repositories::review::list_reviews_by_appointment(pool, appointment_id)
        .await
        .map_err(ClinicError::Database)?;

    Ok((
        Appointment::try_from(row)?,
        existing.into_iter().map(Review::from).collect(),
    ))
}

#[axum::debug_handler]
pub async fn create_review(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let payload = CreateReviewRequest {
        comment: payload
            .comment
            .as_deref()
            .map(validation::sanitize_input)
            .filter(|c| !c.is_empty()),
        ..payload
    };
    ClinicError::from_field_errors(validation::validate_review(payload.rating, payload.comment.as_deref()))?;

    let (appointment, existing) = review_context(&state.db_pool, payload.appointment_id).await?;
    reviews::ensure_can_review(&appointment, &payload.user_id, &existing)?;

    let row = sorriso_db::repositories::review::create_review(&state.db_pool, &payload)
        .await
        .map_err(ClinicError::Database)?;

    Ok((StatusCode::CREATED, Json(Review::from(row))))
}

#[axum::debug_handler]
pub async fn can_review(
    State(state): State<Arc<ApiState>>,
    Path(appointment_id): Path<Uuid>,
    Query(query): Query<CanReviewQuery>,
) -> Result<Json<CanReviewResponse>, AppError> {
    let (appointment, existing) = review_context(&state.db_pool, appointment_id).await?;

    Ok(Json(CanReviewResponse {
        can_review: reviews::can_user_review(&appointment, &query.user_id, &existing),
    }))
}

#[axum::debug_handler]
pub async fn list_clinic_reviews(
    State(state): State<Arc<ApiState>>,
    Path(clinic_id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    let rows = sorriso_db::repositories::review::list_reviews_by_clinic(&state.db_pool, &clinic_id)
        .await
        .map_err(ClinicError::Database)?;

    Ok(Json(rows.into_iter().map(Review::from).collect()))
}

#[axum::debug_handler]
pub async fn clinic_review_stats(
    State(state): State<Arc<ApiState>>,
    Path(clinic_id): Path<String>,
) -> Result<Json<ReviewStats>, AppError> {
    let ratings = sorriso_db::repositories::review::ratings_for_clinic(&state.db_pool, &clinic_id)
        .await
        .map_err(ClinicError::Database)?;

    Ok(Json(ReviewStats::from_ratings(&ratings)))
}
