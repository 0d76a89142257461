use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown appointment status '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub clinic: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub source: String,
    pub webhook_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Booking payload as submitted by the booking form or the chat flow.
///
/// Dates and times stay as strings here so that format errors surface as
/// validation errors instead of deserialization failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub clinic: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub webhook_session_id: Option<String>,
}

/// A validated appointment ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub clinic: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub source: String,
    pub webhook_session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

/// Query string accepted by the dashboard listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentListQuery {
    /// Staff login key; decides which clinics are visible.
    pub user: Option<String>,
    pub clinic: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    /// Exact date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `today`, `week` or `month`.
    pub window: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentEventKind {
    Created,
    Updated,
    Deleted,
}

/// Change notification pushed to realtime subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentEvent {
    pub kind: AppointmentEventKind,
    pub appointment_id: Uuid,
    pub appointment: Option<Appointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicListResponse {
    pub clinics: Vec<String>,
    pub is_master: bool,
    pub user_clinic_name: Option<String>,
}
