use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::appointment::{Appointment, AppointmentStatus};

/// Dashboard counters over an already-scoped list of appointments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentStats {
    pub total: usize,
    /// Appointments scheduled for today.
    pub today: usize,
    /// Appointments created in the current calendar month.
    pub this_month: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub by_clinic: BTreeMap<String, usize>,
}

impl AppointmentStats {
    pub fn compute(appointments: &[Appointment], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut stats = AppointmentStats {
            total: appointments.len(),
            ..Default::default()
        };

        for appointment in appointments {
            if appointment.date == today {
                stats.today += 1;
            }
            if appointment.created_at.year() == now.year()
                && appointment.created_at.month() == now.month()
            {
                stats.this_month += 1;
            }
            match appointment.status {
                AppointmentStatus::Pending => stats.pending += 1,
                AppointmentStatus::Confirmed => stats.confirmed += 1,
                AppointmentStatus::Completed => stats.completed += 1,
                AppointmentStatus::Cancelled => stats.cancelled += 1,
            }
            *stats.by_clinic.entry(appointment.clinic.clone()).or_insert(0) += 1;
        }

        stats
    }
}
