use std::{convert::Infallible, sync::Arc};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use chrono::Utc;
use futures_util::stream::{self, Stream};
use serde::Deserialize;
use sorriso_core::{
    errors::ClinicError,
    filters::{self, DashboardFilter, StaffScope},
    models::appointment::{
        Appointment, AppointmentEventKind, AppointmentListQuery, AppointmentStatus,
        ClinicListResponse, CreateAppointmentRequest, NewAppointment, UpdateStatusRequest,
    },
    slots,
    stats::AppointmentStats,
    validation,
};
use sqlx::PgPool;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::{
    ApiState,
    events,
    handlers::{clinic_today, convert_rows},
    middleware::error_handling::AppError,
    services::messaging,
};

pub const DEFAULT_SOURCE: &str = "pwa";

/// Dashboard view selector. `user` is taken on trust from the caller and
/// only narrows the result; omitting it returns every clinic. Access control
/// belongs in front of these routes, not here.
#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
    pub user: Option<String>,
}

async fn load_appointment(pool: &PgPool, id: Uuid) -> Result<Appointment, AppError> {
    let row = sorriso_db::repositories::appointment::get_appointment_by_id(pool, id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))?;

    Ok(Appointment::try_from(row)?)
}

async fn load_all(pool: &PgPool) -> Result<Vec<Appointment>, AppError> {
    let rows = sorriso_db::repositories::appointment::list_appointments(pool)
        .await
        .map_err(ClinicError::Database)?;
    Ok(convert_rows(rows)?)
}

/// Cleans and checks a booking, returning the row to insert.
pub fn prepare_booking(request: CreateAppointmentRequest) -> Result<NewAppointment, ClinicError> {
    let request = CreateAppointmentRequest {
        name: validation::sanitize_input(&request.name),
        notes: request
            .notes
            .as_deref()
            .map(validation::sanitize_input)
            .filter(|n| !n.is_empty()),
        email: request.email.filter(|e| !e.trim().is_empty()),
        ..request
    };

    ClinicError::from_field_errors(validation::validate_new_appointment(&request))?;

    let date = validation::parse_iso_date(&request.date)
        .ok_or_else(|| ClinicError::Validation(format!("date: invalid date '{}'", request.date)))?;

    if !slots::is_bookable(date, &request.time) {
        return Err(ClinicError::Validation(format!(
            "time: {} is not an available slot on {}",
            request.time, request.date
        )));
    }

    Ok(NewAppointment {
        name: request.name,
        phone: validation::normalize_whatsapp_phone(&request.phone),
        email: request.email,
        clinic: request.clinic.trim().to_string(),
        service: request.service.trim().to_string(),
        date,
        time: request.time,
        status: request.status.unwrap_or(AppointmentStatus::Confirmed),
        notes: request.notes,
        source: request.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        webhook_session_id: request.webhook_session_id,
    })
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    // Validate everything that needs no database first
    let new_appointment = prepare_booking(payload)?;

    // Bookings reference a clinic by slug; store its display label
    let clinic = sorriso_db::repositories::clinic::get_clinic_by_id(&state.db_pool, &new_appointment.clinic)
        .await
        .map_err(ClinicError::Database)?;
    let new_appointment = match clinic {
        Some(row) => NewAppointment {
            clinic: sorriso_core::models::clinic::Clinic::from(row).display_label(),
            ..new_appointment
        },
        None => new_appointment,
    };

    let row = sorriso_db::repositories::appointment::create_appointment(&state.db_pool, &new_appointment)
        .await
        .map_err(ClinicError::Database)?;
    let appointment = Appointment::try_from(row)?;

    tracing::info!(
        "Booked appointment {} at {} on {} {}",
        appointment.id,
        appointment.clinic,
        appointment.date,
        appointment.time
    );

    state.events.publish(AppointmentEventKind::Created, &appointment);

    messaging::notify_booking(
        state.integrations.messages.as_ref(),
        &appointment,
        state.settings.clinic_notification_phone.as_deref(),
    )
    .await;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Dashboard list. The `user` query picks the view and is not an access check.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let filter = DashboardFilter::from_query(&query)?;
    let scope = StaffScope::for_login(query.user.as_deref());

    let appointments = load_all(&state.db_pool).await?;

    Ok(Json(filters::filter_appointments(
        &appointments,
        &scope,
        &filter,
        clinic_today(),
    )))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(load_appointment(&state.db_pool, id).await?))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let row = sorriso_db::repositories::appointment::update_appointment_status(&state.db_pool, id, payload.status)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))?;
    let appointment = Appointment::try_from(row)?;

    state.events.publish(AppointmentEventKind::Updated, &appointment);

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    // Fetched first so subscribers can be scoped by clinic
    let appointment = load_appointment(&state.db_pool, id).await?;

    let deleted = sorriso_db::repositories::appointment::delete_appointment(&state.db_pool, id)
        .await
        .map_err(ClinicError::Database)?;
    if !deleted {
        return Err(ClinicError::NotFound(format!("Appointment with ID {} not found", id)).into());
    }

    state.events.publish(AppointmentEventKind::Deleted, &appointment);

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn appointment_stats(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<AppointmentStats>, AppError> {
    let filter = DashboardFilter::from_query(&query)?;
    let scope = StaffScope::for_login(query.user.as_deref());

    let appointments = load_all(&state.db_pool).await?;
    let visible = filters::filter_appointments(&appointments, &scope, &filter, clinic_today());

    Ok(Json(AppointmentStats::compute(&visible, Utc::now())))
}

#[axum::debug_handler]
pub async fn list_clinics(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<ClinicListResponse>, AppError> {
    let scope = StaffScope::for_login(query.user.as_deref());
    let appointments = load_all(&state.db_pool).await?;

    Ok(Json(ClinicListResponse {
        clinics: filters::available_clinics(&appointments, &scope),
        is_master: scope.is_master(),
        user_clinic_name: scope.clinic_name().map(str::to_string),
    }))
}

/// Realtime change feed for dashboards, filtered by the login's scope.
pub async fn appointment_events(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ScopeQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let scope = StaffScope::for_login(query.user.as_deref());
    let receiver = state.events.subscribe();

    let stream = stream::unfold((receiver, scope), |(mut receiver, scope)| async move {
        loop {
            match receiver.recv().await {
                Ok(event) if events::visible_to(&scope, &event) => {
                    let name = match event.kind {
                        AppointmentEventKind::Created => "created",
                        AppointmentEventKind::Updated => "updated",
                        AppointmentEventKind::Deleted => "deleted",
                    };
                    let sse = match Event::default().event(name).json_data(&event) {
                        Ok(sse) => sse,
                        Err(e) => {
                            tracing::warn!("Dropping unserializable event: {}", e);
                            continue;
                        }
                    };
                    return Some((Ok(sse), (receiver, scope)));
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Realtime subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
