use axum::{Json, extract::State};
use sorriso_core::{
    chat,
    errors::ClinicError,
    models::{
        appointment::{Appointment, AppointmentEventKind},
        chat::{CompletionRequest, CompletionResponse, WebhookAppointmentData, WebhookProcessResponse},
    },
};
use std::sync::Arc;

use crate::{ApiState, handlers::clinic_today, middleware::error_handling::AppError};

/// Anonymous chat widget sessions share one flag identity.
pub const ANONYMOUS_USER: &str = "anonymous";

#[axum::debug_handler]
pub async fn completions(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CompletionRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    let prompt = payload.prompt.trim();
    if prompt.is_empty() {
        return Err(ClinicError::Validation("prompt: must not be empty".to_string()).into());
    }

    let user_id = match payload.user_id.trim() {
        "" => ANONYMOUS_USER,
        id => id,
    };

    let response = state.integrations.ai.complete(prompt, user_id).await?;
    Ok(Json(response))
}

/// Receives chatbot output from the WhatsApp workflow and books the
/// appointment it confirms, if any.
#[axum::debug_handler]
pub async fn webhook_response(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<WebhookAppointmentData>,
) -> Result<Json<WebhookProcessResponse>, AppError> {
    let user_phone = payload.user_phone.as_deref();
    let parsed = chat::parse_appointment(&payload.output, user_phone);

    if !parsed.is_appointment {
        tracing::debug!("Webhook output carries no appointment");
        return Ok(Json(WebhookProcessResponse { parsed, created: None }));
    }

    let Some(new_appointment) = parsed.clone().into_new_appointment(
        payload.session_id.clone(),
        user_phone,
        &payload.output,
        clinic_today(),
    ) else {
        tracing::info!("Confirmed appointment in webhook output lacks a date or time");
        return Ok(Json(WebhookProcessResponse { parsed, created: None }));
    };

    let row = sorriso_db::repositories::appointment::create_appointment(&state.db_pool, &new_appointment)
        .await
        .map_err(ClinicError::Database)?;
    let appointment = Appointment::try_from(row)?;

    tracing::info!("Appointment {} created from webhook session {:?}", appointment.id, payload.session_id);
    state.events.publish(AppointmentEventKind::Created, &appointment);

    Ok(Json(WebhookProcessResponse {
        parsed,
        created: Some(appointment),
    }))
}
