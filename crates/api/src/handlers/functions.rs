//! Endpoints that stood in for hosted serverless functions.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Local;
use serde_json::json;
use sorriso_core::{
    errors::ClinicError,
    models::{
        functions::{ApiKeyResponse, PasswordResetRequest, PasswordResetResponse},
        reminder::ProcessRemindersResponse,
    },
    validation,
};
use sorriso_integrations::email;
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError, services::reminders};

pub const MISSING_XAI_KEY: &str = "XAI API key not configured";

/// Hands the xAI key to the browser client.
pub async fn get_xai_key(State(state): State<Arc<ApiState>>) -> Response {
    match &state.settings.xai_api_key {
        Some(api_key) => Json(ApiKeyResponse {
            api_key: api_key.clone(),
        })
        .into_response(),
        None => {
            tracing::warn!("{}", MISSING_XAI_KEY);
            (StatusCode::BAD_REQUEST, Json(json!({ "error": MISSING_XAI_KEY }))).into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn send_password_reset(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<PasswordResetResponse>, AppError> {
    let to = payload.email.trim();
    if !validation::is_valid_email(to) {
        return Err(ClinicError::Validation("email: invalid email".to_string()).into());
    }
    if payload.reset_url.trim().is_empty() {
        return Err(ClinicError::Validation("resetUrl: must not be empty".to_string()).into());
    }
    if !validation::is_http_url(payload.reset_url.trim()) {
        return Err(ClinicError::Validation("resetUrl: must be an http or https link".to_string()).into());
    }

    let message = email::password_reset_email(to, payload.reset_url.trim());
    let email_response = state.integrations.mailer.send(&message).await?;

    tracing::info!("Password reset email sent to {}", to);

    Ok(Json(PasswordResetResponse {
        success: true,
        email_response,
    }))
}

#[axum::debug_handler]
pub async fn process_reminders(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ProcessRemindersResponse>, AppError> {
    let response = reminders::process_due_reminders(
        &state.db_pool,
        state.integrations.messages.as_ref(),
        Local::now().naive_local(),
    )
    .await
    .map_err(ClinicError::Database)?;

    Ok(Json(response))
}
