//! Reminder delivery run.
//!
//! Shared by `POST /functions/process-reminders` and the
//! `process-reminders` binary. Each pending reminder whose window is open is
//! delivered and marked `sent` or `failed`; reminders outside their window
//! are left pending for a later run.

use chrono::{NaiveDateTime, Utc};
use eyre::Result;
use sorriso_core::{
    models::{
        appointment::Appointment,
        reminder::{ProcessRemindersResponse, ProcessedReminder},
    },
    reminders::{self, ReminderKind, ReminderMethod, ReminderStatus},
};
use sorriso_integrations::webhook::{MessageSender, WebhookMessage};
use sqlx::PgPool;
use uuid::Uuid;

/// Delivers one reminder and reports the outcome.
///
/// Push notifications have no delivery channel yet and are recorded as sent.
pub async fn deliver(
    sender: &dyn MessageSender,
    reminder_id: Uuid,
    kind: ReminderKind,
    method: ReminderMethod,
    appointment: &Appointment,
) -> ReminderStatus {
    let message = reminders::reminder_message(kind, appointment);

    let delivered = match method {
        ReminderMethod::Whatsapp => {
            let (session_id, thread_id) = reminders::reminder_session(&reminder_id);
            let payload = WebhookMessage::new(appointment.phone.clone(), message, session_id)
                .with_thread(thread_id);
            match sender.send(&payload).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("WhatsApp reminder {} failed: {}", reminder_id, e);
                    false
                }
            }
        }
        ReminderMethod::Push => {
            tracing::info!("Push reminder {} for {}", reminder_id, appointment.phone);
            true
        }
    };

    ReminderStatus::from_outcome(delivered)
}

/// Runs one pass over the pending reminders, `now` being clinic local time.
pub async fn process_due_reminders(
    pool: &PgPool,
    sender: &dyn MessageSender,
    now: NaiveDateTime,
) -> Result<ProcessRemindersResponse> {
    let pending = sorriso_db::repositories::reminder::list_pending_reminders(pool).await?;
    tracing::info!("Processing {} pending reminders", pending.len());

    let mut processed = Vec::new();

    for row in pending {
        let (kind, method) = match (
            row.reminder_type.parse::<ReminderKind>(),
            row.method.parse::<ReminderMethod>(),
        ) {
            (Ok(kind), Ok(method)) => (kind, method),
            _ => {
                tracing::warn!("Skipping reminder {} with unknown type or method", row.reminder_id);
                continue;
            }
        };

        let appointment = match Appointment::try_from(row.appointment) {
            Ok(appointment) => appointment,
            Err(e) => {
                tracing::warn!("Skipping reminder {}: {}", row.reminder_id, e);
                continue;
            }
        };

        let due = reminders::hours_until(&appointment, now).is_some_and(|hours| kind.is_due(hours));
        if !due {
            continue;
        }

        let status = deliver(sender, row.reminder_id, kind, method, &appointment).await;

        if let Err(e) = sorriso_db::repositories::reminder::mark_reminder(pool, row.reminder_id, status).await {
            tracing::error!("Failed to update reminder {}: {}", row.reminder_id, e);
        }

        processed.push(ProcessedReminder {
            id: row.reminder_id,
            status,
            method,
        });
    }

    tracing::info!("Processed {} reminders at {}", processed.len(), Utc::now());

    Ok(ProcessRemindersResponse {
        success: true,
        processed: processed.len(),
        reminders: processed,
    })
}
