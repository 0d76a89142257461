use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reminders::{ReminderKind, ReminderMethod, ReminderStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub kind: ReminderKind,
    pub method: ReminderMethod,
    pub status: ReminderStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    pub appointment_id: Uuid,
    pub kind: ReminderKind,
    pub method: ReminderMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedReminder {
    pub id: Uuid,
    pub status: ReminderStatus,
    pub method: ReminderMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRemindersResponse {
    pub success: bool,
    pub processed: usize,
    pub reminders: Vec<ProcessedReminder>,
}
