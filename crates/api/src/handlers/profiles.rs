use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{Local, Timelike};
use sorriso_core::{
    errors::ClinicError,
    models::profile::{
        CreateProfileRequest, Profile, ThemeResponse, UpdateProfileRequest, UpdateThemeRequest,
    },
    theme, validation,
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

fn not_found(auth_user_id: &str) -> ClinicError {
    ClinicError::NotFound(format!("Profile for user {} not found", auth_user_id))
}

fn theme_response(profile: &Profile) -> ThemeResponse {
    ThemeResponse {
        preference: profile.theme,
        current: theme::resolve(profile.theme, Local::now().hour()),
    }
}

#[axum::debug_handler]
pub async fn create_profile(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let full_name = validation::sanitize_input(&payload.full_name);
    let phone = payload.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());

    ClinicError::from_field_errors(validation::validate_profile(&full_name, phone))?;
    if payload.auth_user_id.trim().is_empty() {
        return Err(ClinicError::Validation("auth_user_id: must not be empty".to_string()).into());
    }

    let row = sorriso_db::repositories::profile::create_profile(
        &state.db_pool,
        payload.auth_user_id.trim(),
        &full_name,
        phone,
    )
    .await
    .map_err(ClinicError::Database)?;

    Ok((StatusCode::CREATED, Json(Profile::try_from(row)?)))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<ApiState>>,
    Path(auth_user_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let row = sorriso_db::repositories::profile::get_profile(&state.db_pool, &auth_user_id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| not_found(&auth_user_id))?;

    Ok(Json(Profile::try_from(row)?))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<ApiState>>,
    Path(auth_user_id): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let full_name = payload.full_name.as_deref().map(validation::sanitize_input);
    let phone = payload.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());

    // Only the supplied fields are checked
    match &full_name {
        Some(name) => ClinicError::from_field_errors(validation::validate_profile(name, phone))?,
        None if phone.is_some_and(|p| !validation::is_valid_phone_number(p)) => {
            return Err(ClinicError::Validation("phone: must have 10 or 11 digits".to_string()).into());
        }
        None => {}
    }

    let row = sorriso_db::repositories::profile::update_profile(
        &state.db_pool,
        &auth_user_id,
        full_name.as_deref(),
        phone,
    )
    .await
    .map_err(ClinicError::Database)?
    .ok_or_else(|| not_found(&auth_user_id))?;

    Ok(Json(Profile::try_from(row)?))
}

#[axum::debug_handler]
pub async fn get_theme(
    State(state): State<Arc<ApiState>>,
    Path(auth_user_id): Path<String>,
) -> Result<Json<ThemeResponse>, AppError> {
    let row = sorriso_db::repositories::profile::get_profile(&state.db_pool, &auth_user_id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| not_found(&auth_user_id))?;

    Ok(Json(theme_response(&Profile::try_from(row)?)))
}

#[axum::debug_handler]
pub async fn update_theme(
    State(state): State<Arc<ApiState>>,
    Path(auth_user_id): Path<String>,
    Json(payload): Json<UpdateThemeRequest>,
) -> Result<Json<ThemeResponse>, AppError> {
    let row = sorriso_db::repositories::profile::update_theme(&state.db_pool, &auth_user_id, payload.preference)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| not_found(&auth_user_id))?;

    Ok(Json(theme_response(&Profile::try_from(row)?)))
}
