use axum::{Json, extract::State, http::StatusCode};
use sorriso_core::{
    errors::ClinicError,
    models::reminder::{CreateReminderRequest, Reminder},
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_reminder(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateReminderRequest>,
) -> Result<(StatusCode, Json<Reminder>), AppError> {
    sorriso_db::repositories::appointment::get_appointment_by_id(&state.db_pool, payload.appointment_id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| {
            ClinicError::NotFound(format!("Appointment with ID {} not found", payload.appointment_id))
        })?;

    let row = sorriso_db::repositories::reminder::create_reminder(
        &state.db_pool,
        payload.appointment_id,
        payload.kind,
        payload.method,
    )
    .await
    .map_err(ClinicError::Database)?;

    Ok((StatusCode::CREATED, Json(Reminder::try_from(row)?)))
}
