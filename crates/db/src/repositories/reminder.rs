use chrono::Utc;
use eyre::Result;
use sorriso_core::reminders::{ReminderKind, ReminderMethod, ReminderStatus};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbPendingReminder, DbReminder};

const COLUMNS: &str = "id, appointment_id, reminder_type, method, status, sent_at, created_at";

pub async fn create_reminder(
    pool: &Pool<Postgres>,
    appointment_id: Uuid,
    kind: ReminderKind,
    method: ReminderMethod,
) -> Result<DbReminder> {
    let id = Uuid::new_v4();

    tracing::debug!(
        "Creating reminder: id={}, appointment_id={}, type={}, method={}",
        id, appointment_id, kind, method
    );

    let row = sqlx::query_as::<_, DbReminder>(&format!(
        r#"
        INSERT INTO reminders (id, appointment_id, reminder_type, method, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(appointment_id)
    .bind(kind.as_str())
    .bind(method.as_str())
    .bind(ReminderStatus::Pending.as_str())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Pending reminders together with their appointment.
pub async fn list_pending_reminders(pool: &Pool<Postgres>) -> Result<Vec<DbPendingReminder>> {
    let rows = sqlx::query_as::<_, DbPendingReminder>(
        r#"
        SELECT r.id AS reminder_id, r.reminder_type, r.method,
               a.id, a.name, a.phone, a.email, a.clinic, a.service, a.date, a.time,
               a.status, a.notes, a.source, a.webhook_session_id, a.created_at
        FROM reminders r
        JOIN appointments a ON a.id = r.appointment_id
        WHERE r.status = 'pending'
        ORDER BY a.date, a.time
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Found {} pending reminders", rows.len());
    Ok(rows)
}

pub async fn mark_reminder(pool: &Pool<Postgres>, id: Uuid, status: ReminderStatus) -> Result<()> {
    sqlx::query("UPDATE reminders SET status = $2, sent_at = $3 WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(())
}
