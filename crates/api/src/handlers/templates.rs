use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sorriso_core::{
    errors::ClinicError,
    models::{
        appointment::Appointment,
        template::{
            BulkReminderRequest, CreateTemplateRequest, MessageTemplate, PreviewTemplateRequest,
            PreviewTemplateResponse, SendReport, SendTemplateRequest, UpdateTemplateRequest,
        },
    },
    templates,
};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiSettings, ApiState,
    handlers::convert_rows,
    middleware::error_handling::AppError,
    services::messaging,
};

async fn load_template(pool: &PgPool, id: Uuid) -> Result<MessageTemplate, AppError> {
    let row = sorriso_db::repositories::message_template::get_template_by_id(pool, id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound(format!("Template with ID {} not found", id)))?;
    Ok(MessageTemplate::try_from(row)?)
}

/// Distinct recipient ids in request order, rejecting batches the paced
/// send could not finish before the request times out.
pub fn recipient_ids(ids: &[Uuid], settings: &ApiSettings) -> Result<Vec<Uuid>, ClinicError> {
    let mut distinct: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !distinct.contains(id) {
            distinct.push(*id);
        }
    }

    if distinct.is_empty() {
        return Err(ClinicError::Validation("appointment_ids: must not be empty".to_string()));
    }

    if let Some(max) = messaging::max_recipients(settings.template_send_interval, settings.request_timeout) {
        if distinct.len() > max {
            return Err(ClinicError::Validation(format!(
                "appointment_ids: at most {} recipients per request, got {}",
                max,
                distinct.len()
            )));
        }
    }

    Ok(distinct)
}

/// Appointments for the given ids plus how many ids matched nothing.
async fn load_recipients(pool: &PgPool, ids: &[Uuid]) -> Result<(Vec<Appointment>, usize), AppError> {
    let rows = sorriso_db::repositories::appointment::list_appointments_by_ids(pool, ids)
        .await
        .map_err(ClinicError::Database)?;
    let appointments: Vec<Appointment> = convert_rows(rows)?;
    let missing = ids.len().saturating_sub(appointments.len());

    Ok((appointments, missing))
}

fn check_template_text(name: Option<&str>, content: Option<&str>) -> Result<(), ClinicError> {
    if name.is_some_and(|n| n.trim().chars().count() < 2) {
        return Err(ClinicError::Validation("name: must have at least 2 characters".to_string()));
    }
    if content.is_some_and(|c| c.trim().is_empty()) {
        return Err(ClinicError::Validation("content: must not be empty".to_string()));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_templates(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<MessageTemplate>>, AppError> {
    let rows = sorriso_db::repositories::message_template::list_templates(&state.db_pool)
        .await
        .map_err(ClinicError::Database)?;
    Ok(Json(convert_rows(rows)?))
}

#[axum::debug_handler]
pub async fn create_template(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<MessageTemplate>), AppError> {
    check_template_text(Some(&payload.name), Some(&payload.content))?;

    let variables = templates::extract_variables(&payload.content);
    let row = sorriso_db::repositories::message_template::create_template(
        &state.db_pool,
        payload.name.trim(),
        payload.category,
        &payload.subject,
        &payload.content,
        &variables,
        payload.is_active.unwrap_or(true),
    )
    .await
    .map_err(ClinicError::Database)?;

    Ok((StatusCode::CREATED, Json(MessageTemplate::try_from(row)?)))
}

#[axum::debug_handler]
pub async fn get_template(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageTemplate>, AppError> {
    Ok(Json(load_template(&state.db_pool, id).await?))
}

#[axum::debug_handler]
pub async fn update_template(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> Result<Json<MessageTemplate>, AppError> {
    check_template_text(payload.name.as_deref(), payload.content.as_deref())?;

    let variables = payload.content.as_deref().map(templates::extract_variables);
    let row = sorriso_db::repositories::message_template::update_template(
        &state.db_pool,
        id,
        &payload,
        variables.as_deref(),
    )
    .await
    .map_err(ClinicError::Database)?
    .ok_or_else(|| ClinicError::NotFound(format!("Template with ID {} not found", id)))?;

    Ok(Json(MessageTemplate::try_from(row)?))
}

#[axum::debug_handler]
pub async fn delete_template(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = sorriso_db::repositories::message_template::delete_template(&state.db_pool, id)
        .await
        .map_err(ClinicError::Database)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ClinicError::NotFound(format!("Template with ID {} not found", id)).into())
    }
}

#[axum::debug_handler]
pub async fn preview_template(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PreviewTemplateRequest>,
) -> Result<Json<PreviewTemplateResponse>, AppError> {
    let template = load_template(&state.db_pool, id).await?;

    let row = sorriso_db::repositories::appointment::get_appointment_by_id(&state.db_pool, payload.appointment_id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| {
            ClinicError::NotFound(format!("Appointment with ID {} not found", payload.appointment_id))
        })?;
    let appointment = Appointment::try_from(row)?;

    Ok(Json(PreviewTemplateResponse {
        content: templates::render(&template.content, &appointment),
    }))
}

#[axum::debug_handler]
pub async fn send_template(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SendTemplateRequest>,
) -> Result<Json<SendReport>, AppError> {
    let ids = recipient_ids(&payload.appointment_ids, &state.settings)?;

    let template = load_template(&state.db_pool, id).await?;
    if !template.is_active {
        return Err(ClinicError::Validation(format!("template '{}' is inactive", template.name)).into());
    }

    let (appointments, missing) = load_recipients(&state.db_pool, &ids).await?;

    let mut report = messaging::send_to_appointments(
        state.integrations.messages.as_ref(),
        &appointments,
        &template.content,
        state.settings.template_send_interval,
        "template",
    )
    .await;
    report.failed += missing;

    Ok(Json(report))
}

/// Sends the active template of the requested category, or the built-in text.
#[axum::debug_handler]
pub async fn send_bulk_reminders(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BulkReminderRequest>,
) -> Result<Json<SendReport>, AppError> {
    let ids = recipient_ids(&payload.appointment_ids, &state.settings)?;

    let stored = sorriso_db::repositories::message_template::find_active_by_category(&state.db_pool, payload.category)
        .await
        .map_err(ClinicError::Database)?;
    let content = match stored {
        Some(row) => MessageTemplate::try_from(row)?.content,
        None => templates::default_template(payload.category).to_string(),
    };

    let (appointments, missing) = load_recipients(&state.db_pool, &ids).await?;

    let mut report = messaging::send_to_appointments(
        state.integrations.messages.as_ref(),
        &appointments,
        &content,
        state.settings.template_send_interval,
        payload.category.as_str(),
    )
    .await;
    report.failed += missing;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn paced(interval_ms: u64, timeout_secs: u64) -> ApiSettings {
        ApiSettings {
            template_send_interval: Duration::from_millis(interval_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            ..ApiSettings::default()
        }
    }

    #[test]
    fn duplicate_ids_are_sent_once() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let ids = recipient_ids(&[first, second, first, first], &paced(1000, 30)).unwrap();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn oversized_batches_are_rejected_up_front() {
        let ids: Vec<Uuid> = (0..40).map(|_| Uuid::new_v4()).collect();

        let err = recipient_ids(&ids, &paced(1000, 30)).unwrap_err();
        assert!(matches!(err, ClinicError::Validation(msg) if msg.contains("at most 25")));

        assert_eq!(recipient_ids(&ids[..25], &paced(1000, 30)).unwrap().len(), 25);
        assert_eq!(recipient_ids(&ids, &paced(0, 30)).unwrap().len(), 40);
    }

    #[test]
    fn empty_batches_are_rejected() {
        assert!(recipient_ids(&[], &ApiSettings::default()).is_err());
    }
}
