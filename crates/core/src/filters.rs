//! Dashboard filtering.
//!
//! Staff dashboards list appointments narrowed first by the staff member's
//! scope (a single clinic or everything for the management login), then by
//! the filters chosen in the UI. All date arithmetic is done on calendar
//! dates relative to a caller-supplied `today`.

use std::{collections::BTreeSet, str::FromStr};

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::{
    catalog,
    errors::{ClinicError, ClinicResult},
    models::appointment::{Appointment, AppointmentListQuery, AppointmentStatus},
    validation::parse_iso_date,
};

/// Login that sees every clinic.
pub const MASTER_LOGIN: &str = "gerencia-ss";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffScope {
    /// No login supplied; nothing is hidden.
    Unscoped,
    Master,
    Clinic { key: String, name: String },
    /// A login that maps to no clinic sees nothing.
    Unknown,
}

impl StaffScope {
    /// Maps a login key to what its dashboard shows.
    ///
    /// This narrows a view, it does not authorize one. The key usually comes
    /// straight from a query string and `None` yields [`StaffScope::Unscoped`].
    pub fn for_login(user: Option<&str>) -> Self {
        match user.map(str::trim).filter(|u| !u.is_empty()) {
            None => StaffScope::Unscoped,
            Some(MASTER_LOGIN) => StaffScope::Master,
            Some(key) => match catalog::clinic_name_for_login(key) {
                Some(name) => StaffScope::Clinic {
                    key: key.to_string(),
                    name: name.to_string(),
                },
                None => StaffScope::Unknown,
            },
        }
    }

    pub fn is_master(&self) -> bool {
        matches!(self, StaffScope::Master)
    }

    pub fn clinic_name(&self) -> Option<&str> {
        match self {
            StaffScope::Clinic { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Appointment clinics are free text, so a clinic login matches on its key,
    /// its display name, or an exact label.
    pub fn allows(&self, clinic: &str) -> bool {
        match self {
            StaffScope::Unscoped | StaffScope::Master => true,
            StaffScope::Unknown => false,
            StaffScope::Clinic { key, name } => {
                let clinic_lower = clinic.to_lowercase();
                clinic_lower.contains(&key.to_lowercase())
                    || clinic_lower.contains(&name.to_lowercase())
                    || clinic == name
            }
        }
    }
}

/// Coarse "recent" windows used by the clinic dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateWindow::All => true,
            DateWindow::Today => date == today,
            DateWindow::Week => date >= today - Days::new(7),
            DateWindow::Month => date >= today - Days::new(30),
        }
    }
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(DateWindow::All),
            "today" => Ok(DateWindow::Today),
            "week" => Ok(DateWindow::Week),
            "month" => Ok(DateWindow::Month),
            other => Err(format!("unknown date window '{}'", other)),
        }
    }
}

/// Calendar periods used by the management dashboard.
///
/// Weeks start on Sunday. The "current" periods (`Week`, `Month`, `Quarter`,
/// `Year`) have no upper bound, so future bookings are included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Period {
    #[default]
    All,
    Today,
    Yesterday,
    Week,
    LastWeek,
    Month,
    LastMonth,
    Quarter,
    LastQuarter,
    Year,
    LastYear,
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Period::All),
            "today" => Ok(Period::Today),
            "yesterday" => Ok(Period::Yesterday),
            "week" => Ok(Period::Week),
            "last_week" => Ok(Period::LastWeek),
            "month" => Ok(Period::Month),
            "last_month" => Ok(Period::LastMonth),
            "quarter" => Ok(Period::Quarter),
            "last_quarter" => Ok(Period::LastQuarter),
            "year" => Ok(Period::Year),
            "last_year" => Ok(Period::LastYear),
            other => Err(format!("unknown period '{}'", other)),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn start_of_week(today: NaiveDate) -> NaiveDate {
    today - Days::new(u64::from(today.weekday().num_days_from_sunday()))
}

fn start_of_quarter(today: NaiveDate) -> NaiveDate {
    let month = (today.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(today.year(), month, 1).unwrap_or(today)
}

impl Period {
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Period::All => true,
            Period::Today => date == today,
            Period::Yesterday => date == today - Days::new(1),
            Period::Week => date >= start_of_week(today),
            Period::LastWeek => {
                let start = start_of_week(today) - Days::new(7);
                let end = start + Days::new(6);
                date >= start && date <= end
            }
            Period::Month => date >= first_of_month(today),
            Period::LastMonth => {
                let this_month = first_of_month(today);
                let start = this_month - Months::new(1);
                let end = this_month - Days::new(1);
                date >= start && date <= end
            }
            Period::Quarter => date >= start_of_quarter(today),
            Period::LastQuarter => {
                let this_quarter = start_of_quarter(today);
                let start = this_quarter - Months::new(3);
                let end = this_quarter - Days::new(1);
                date >= start && date <= end
            }
            Period::Year => date.year() >= today.year(),
            Period::LastYear => date.year() == today.year() - 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub clinic: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub search: Option<String>,
    pub date: Option<NaiveDate>,
    pub window: DateWindow,
    pub period: Period,
}

fn selected(value: Option<&String>) -> Option<&str> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && *v != "all")
}

impl DashboardFilter {
    /// Builds a filter from query parameters; `all` or empty values disable a filter.
    pub fn from_query(query: &AppointmentListQuery) -> ClinicResult<Self> {
        let status = selected(query.status.as_ref())
            .map(AppointmentStatus::from_str)
            .transpose()
            .map_err(ClinicError::Validation)?;

        let date = selected(query.date.as_ref())
            .map(|d| {
                parse_iso_date(d).ok_or_else(|| {
                    ClinicError::Validation(format!("date '{}' is not YYYY-MM-DD", d))
                })
            })
            .transpose()?;

        let window = selected(query.window.as_ref())
            .map(DateWindow::from_str)
            .transpose()
            .map_err(ClinicError::Validation)?
            .unwrap_or_default();

        let period = selected(query.period.as_ref())
            .map(Period::from_str)
            .transpose()
            .map_err(ClinicError::Validation)?
            .unwrap_or_default();

        Ok(Self {
            clinic: selected(query.clinic.as_ref()).map(str::to_string),
            status,
            search: query
                .search
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            date,
            window,
            period,
        })
    }

    pub fn matches(&self, appointment: &Appointment, today: NaiveDate) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let found = appointment.name.to_lowercase().contains(&needle)
                || appointment.phone.contains(search.as_str())
                || appointment.service.to_lowercase().contains(&needle);
            if !found {
                return false;
            }
        }

        if let Some(clinic) = &self.clinic {
            if !appointment
                .clinic
                .to_lowercase()
                .contains(&clinic.to_lowercase())
            {
                return false;
            }
        }

        if let Some(status) = self.status {
            if appointment.status != status {
                return false;
            }
        }

        if let Some(date) = self.date {
            if appointment.date != date {
                return false;
            }
        }

        self.window.contains(appointment.date, today) && self.period.contains(appointment.date, today)
    }
}

/// Applies the staff scope and then the dashboard filter, preserving order.
pub fn filter_appointments(
    appointments: &[Appointment],
    scope: &StaffScope,
    filter: &DashboardFilter,
    today: NaiveDate,
) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|apt| scope.allows(&apt.clinic))
        .filter(|apt| filter.matches(apt, today))
        .cloned()
        .collect()
}

/// Sorted, de-duplicated clinic labels visible to `scope`.
pub fn available_clinics(appointments: &[Appointment], scope: &StaffScope) -> Vec<String> {
    appointments
        .iter()
        .filter(|apt| scope.allows(&apt.clinic))
        .map(|apt| apt.clinic.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
