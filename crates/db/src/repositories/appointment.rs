use chrono::{NaiveDate, Utc};
use eyre::Result;
use sorriso_core::models::appointment::{AppointmentStatus, NewAppointment};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::DbAppointment;

const COLUMNS: &str = "id, name, phone, email, clinic, service, date, time, status, notes, source, webhook_session_id, created_at";

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    appointment: &NewAppointment,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, clinic={}, date={}, time={}, source={}",
        id, appointment.clinic, appointment.date, appointment.time, appointment.source
    );

    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments
            (id, name, phone, email, clinic, service, date, time, status, notes, source, webhook_session_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&appointment.name)
    .bind(&appointment.phone)
    .bind(&appointment.email)
    .bind(&appointment.clinic)
    .bind(&appointment.service)
    .bind(appointment.date)
    .bind(&appointment.time)
    .bind(appointment.status.as_str())
    .bind(&appointment.notes)
    .bind(&appointment.source)
    .bind(&appointment.webhook_session_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Appointment created successfully: id={}", id);
    Ok(row)
}

pub async fn get_appointment_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAppointment>> {
    tracing::debug!("Getting appointment by id: {}", id);

    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// All appointments, most recent booking first. Scoping and filtering happen in the caller.
pub async fn list_appointments(pool: &Pool<Postgres>) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {COLUMNS} FROM appointments ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    tracing::debug!("Listed {} appointments", rows.len());
    Ok(rows)
}

pub async fn list_appointments_by_ids(pool: &Pool<Postgres>, ids: &[Uuid]) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE id = ANY($1) ORDER BY date, time"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn list_appointments_by_phone(pool: &Pool<Postgres>, phone: &str) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE phone = $1 ORDER BY date DESC, time DESC"
    ))
    .bind(phone)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Times already taken on `date` at `clinic`, cancelled bookings excluded.
pub async fn booked_times(pool: &Pool<Postgres>, clinic: &str, date: NaiveDate) -> Result<Vec<String>> {
    let times = sqlx::query_scalar::<_, String>(
        r#"
        SELECT time FROM appointments
        WHERE clinic = $1 AND date = $2 AND status <> 'cancelled'
        ORDER BY time
        "#,
    )
    .bind(clinic)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(times)
}

pub async fn update_appointment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: AppointmentStatus,
) -> Result<Option<DbAppointment>> {
    tracing::debug!("Updating appointment status: id={}, status={}", id, status);

    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        "UPDATE appointments SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns whether a row was deleted.
pub async fn delete_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    tracing::debug!("Deleting appointment: id={}", id);

    let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
