use chrono::Utc;
use eyre::Result;
use sorriso_core::models::review::CreateReviewRequest;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::DbReview;

const COLUMNS: &str = "id, appointment_id, user_id, clinic_id, rating, comment, created_at";

pub async fn create_review(pool: &Pool<Postgres>, review: &CreateReviewRequest) -> Result<DbReview> {
    let id = Uuid::new_v4();

    tracing::debug!(
        "Creating review: id={}, appointment_id={}, clinic_id={}, rating={}",
        id, review.appointment_id, review.clinic_id, review.rating
    );

    let row = sqlx::query_as::<_, DbReview>(&format!(
        r#"
        INSERT INTO reviews (id, appointment_id, user_id, clinic_id, rating, comment, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(review.appointment_id)
    .bind(&review.user_id)
    .bind(&review.clinic_id)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn list_reviews_by_clinic(pool: &Pool<Postgres>, clinic_id: &str) -> Result<Vec<DbReview>> {
    let rows = sqlx::query_as::<_, DbReview>(&format!(
        "SELECT {COLUMNS} FROM reviews WHERE clinic_id = $1 ORDER BY created_at DESC"
    ))
    .bind(clinic_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn list_reviews_by_appointment(pool: &Pool<Postgres>, appointment_id: Uuid) -> Result<Vec<DbReview>> {
    let rows = sqlx::query_as::<_, DbReview>(&format!(
        "SELECT {COLUMNS} FROM reviews WHERE appointment_id = $1"
    ))
    .bind(appointment_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn ratings_for_clinic(pool: &Pool<Postgres>, clinic_id: &str) -> Result<Vec<i16>> {
    let ratings = sqlx::query_scalar::<_, i16>("SELECT rating FROM reviews WHERE clinic_id = $1")
        .bind(clinic_id)
        .fetch_all(pool)
        .await?;

    Ok(ratings)
}
