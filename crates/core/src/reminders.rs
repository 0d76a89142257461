//! Appointment reminders: due windows and message text.

use std::{fmt, str::FromStr};

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::appointment::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderKind {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "30min")]
    HalfHour,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 3] = [ReminderKind::Day, ReminderKind::TwoHours, ReminderKind::HalfHour];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Day => "24h",
            ReminderKind::TwoHours => "2h",
            ReminderKind::HalfHour => "30min",
        }
    }

    /// Lead time as written in the message.
    pub fn label(&self) -> &'static str {
        match self {
            ReminderKind::Day => "24 horas",
            ReminderKind::TwoHours => "2 horas",
            ReminderKind::HalfHour => "30 minutos",
        }
    }

    /// Windows do not overlap, so each pending reminder fires at most once per run.
    pub fn is_due(&self, hours_until: f64) -> bool {
        match self {
            ReminderKind::Day => hours_until > 2.0 && hours_until <= 24.0,
            ReminderKind::TwoHours => hours_until > 0.5 && hours_until <= 2.0,
            ReminderKind::HalfHour => hours_until > 0.0 && hours_until <= 0.5,
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReminderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown reminder type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Whatsapp,
    Push,
}

impl ReminderMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderMethod::Whatsapp => "whatsapp",
            ReminderMethod::Push => "push",
        }
    }
}

impl fmt::Display for ReminderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whatsapp" => Ok(ReminderMethod::Whatsapp),
            "push" => Ok(ReminderMethod::Push),
            _ => Err(format!("unknown reminder method '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Failed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Sent => "sent",
            ReminderStatus::Failed => "failed",
        }
    }

    pub fn from_outcome(success: bool) -> Self {
        if success { ReminderStatus::Sent } else { ReminderStatus::Failed }
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReminderStatus::Pending),
            "sent" => Ok(ReminderStatus::Sent),
            "failed" => Ok(ReminderStatus::Failed),
            _ => Err(format!("unknown reminder status '{}'", s)),
        }
    }
}

/// Hours from `now` until the appointment starts, in clinic local time.
/// `None` when the stored time cannot be parsed.
pub fn hours_until(appointment: &Appointment, now: NaiveDateTime) -> Option<f64> {
    let time = NaiveTime::parse_from_str(&appointment.time, "%H:%M").ok()?;
    let starts_at = appointment.date.and_time(time);
    Some((starts_at - now).num_seconds() as f64 / 3600.0)
}

pub fn reminder_message(kind: ReminderKind, appointment: &Appointment) -> String {
    format!(
        "🦷 Lembrete: Sua consulta na {} está em {}!\n\n📅 Data: {}\n🕐 Horário: {}\n⚕️ Serviço: {}\n\nPor favor, chegue 15 minutos antes do horário.\n\nSorriso Inteligente App",
        appointment.clinic,
        kind.label(),
        appointment.date.format("%d/%m/%Y"),
        appointment.time,
        appointment.service,
    )
}

/// Session identifiers sent along with a WhatsApp reminder.
pub fn reminder_session(reminder_id: &uuid::Uuid) -> (String, String) {
    (
        format!("reminder_{}", reminder_id),
        format!("thread_reminder_{}", reminder_id),
    )
}
