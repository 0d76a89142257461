//! Patient points, streaks and badges.
//!
//! Every write re-evaluates the badge rules against the patient's
//! appointment history (matched by the phone on their profile) and awards
//! anything newly earned.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use sorriso_core::{
    errors::ClinicError,
    gamification::{self, DEFAULT_BADGES},
    models::{
        appointment::Appointment,
        gamification::{AddPointsRequest, AwardBadgeRequest, Badge, GamificationResponse, Progress, StreakRequest},
    },
    validation,
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    ApiState,
    handlers::convert_rows,
    middleware::error_handling::AppError,
};

async fn load_progress(pool: &PgPool, user_id: &str) -> Result<Progress, AppError> {
    match sorriso_db::repositories::gamification::get_progress(pool, user_id)
        .await
        .map_err(ClinicError::Database)?
    {
        Some(row) => Ok(Progress::try_from(row)?),
        None => Ok(Progress::new(user_id)),
    }
}

async fn load_badges(pool: &PgPool, user_id: &str) -> Result<Vec<Badge>, AppError> {
    let rows = sorriso_db::repositories::gamification::list_badges(pool, user_id)
        .await
        .map_err(ClinicError::Database)?;
    Ok(rows.into_iter().map(Badge::from).collect())
}

async fn history_for(pool: &PgPool, user_id: &str) -> Result<Vec<Appointment>, AppError> {
    let profile = sorriso_db::repositories::profile::get_profile(pool, user_id)
        .await
        .map_err(ClinicError::Database)?;

    let Some(phone) = profile.and_then(|p| p.phone).filter(|p| !p.trim().is_empty()) else {
        return Ok(Vec::new());
    };

    let rows = sorriso_db::repositories::appointment::list_appointments_by_phone(
        pool,
        &validation::normalize_whatsapp_phone(&phone),
    )
    .await
    .map_err(ClinicError::Database)?;
    Ok(convert_rows(rows)?)
}

/// Awards every badge the rules grant that the patient does not hold yet.
async fn award_earned(pool: &PgPool, progress: &Progress) -> Result<(), AppError> {
    let history = history_for(pool, &progress.user_id).await?;

    for key in gamification::badges_earned(progress, &history) {
        let Some(definition) = gamification::badge_definition(key) else {
            continue;
        };
        let awarded = sorriso_db::repositories::gamification::award_badge(pool, &progress.user_id, definition)
            .await
            .map_err(ClinicError::Database)?;
        if awarded.is_some() {
            tracing::info!("User {} earned badge {}", progress.user_id, key);
        }
    }

    Ok(())
}

async fn respond(pool: &PgPool, progress: Progress) -> Result<Json<GamificationResponse>, AppError> {
    let awarded = load_badges(pool, &progress.user_id).await?;
    let badges = gamification::badge_board(&progress.user_id, &awarded);
    Ok(Json(GamificationResponse { progress, badges }))
}

#[axum::debug_handler]
pub async fn get_gamification(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<String>,
) -> Result<Json<GamificationResponse>, AppError> {
    let progress = load_progress(&state.db_pool, &user_id).await?;
    respond(&state.db_pool, progress).await
}

#[axum::debug_handler]
pub async fn add_points(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<AddPointsRequest>,
) -> Result<Json<GamificationResponse>, AppError> {
    if payload.points == 0 || payload.points > gamification::MAX_POINTS_PER_AWARD {
        return Err(ClinicError::Validation(format!(
            "points: must be between 1 and {}",
            gamification::MAX_POINTS_PER_AWARD
        ))
        .into());
    }
    if payload.description.trim().is_empty() {
        return Err(ClinicError::Validation("description: must not be empty".to_string()).into());
    }

    let mut progress = load_progress(&state.db_pool, &user_id).await?;
    let previous_level = progress.level;
    progress.add_points(payload.points, payload.description.trim(), payload.kind, Utc::now());

    if progress.level > previous_level {
        tracing::info!("User {} reached level {}", user_id, progress.level);
    }

    let saved = sorriso_db::repositories::gamification::save_progress(&state.db_pool, &progress)
        .await
        .map_err(ClinicError::Database)?;
    let progress = Progress::try_from(saved)?;

    award_earned(&state.db_pool, &progress).await?;
    respond(&state.db_pool, progress).await
}

#[axum::debug_handler]
pub async fn update_streak(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<StreakRequest>,
) -> Result<Json<GamificationResponse>, AppError> {
    let mut progress = load_progress(&state.db_pool, &user_id).await?;
    progress.record_visit(payload.increment);

    let saved = sorriso_db::repositories::gamification::save_progress(&state.db_pool, &progress)
        .await
        .map_err(ClinicError::Database)?;
    let progress = Progress::try_from(saved)?;

    award_earned(&state.db_pool, &progress).await?;
    respond(&state.db_pool, progress).await
}

#[axum::debug_handler]
pub async fn list_badges(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Badge>>, AppError> {
    let awarded = load_badges(&state.db_pool, &user_id).await?;
    Ok(Json(gamification::badge_board(&user_id, &awarded)))
}

/// Awards a badge by key. Awarding an already held badge is a no-op.
#[axum::debug_handler]
pub async fn award_badge(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<AwardBadgeRequest>,
) -> Result<Json<Vec<Badge>>, AppError> {
    let definition = gamification::badge_definition(&payload.badge_key).ok_or_else(|| {
        let known: Vec<&str> = DEFAULT_BADGES.iter().map(|b| b.key).collect();
        ClinicError::NotFound(format!(
            "Badge '{}' not found, expected one of: {}",
            payload.badge_key,
            known.join(", ")
        ))
    })?;

    sorriso_db::repositories::gamification::award_badge(&state.db_pool, &user_id, definition)
        .await
        .map_err(ClinicError::Database)?;

    let awarded = load_badges(&state.db_pool, &user_id).await?;
    Ok(Json(gamification::badge_board(&user_id, &awarded)))
}
