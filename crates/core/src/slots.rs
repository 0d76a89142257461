//! Opening-hours lookup.
//!
//! Availability is a fixed table keyed by weekday: half-hour slots from 08:00
//! to 19:00 on weekdays, 08:00 to 13:00 on Saturday, closed on Sunday.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

const WEEKDAY_SLOTS: [&str; 23] = [
    "08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30",
    "13:00", "13:30", "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00", "17:30",
    "18:00", "18:30", "19:00",
];

const SATURDAY_SLOTS: [&str; 11] = [
    "08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30",
    "13:00",
];

/// Bookable times for a date, as `HH:MM` strings.
pub fn time_slots_for(date: NaiveDate) -> &'static [&'static str] {
    match date.weekday() {
        Weekday::Sun => &[],
        Weekday::Sat => &SATURDAY_SLOTS,
        _ => &WEEKDAY_SLOTS,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub time_slots: Vec<&'static str>,
    pub is_weekend: bool,
    pub is_closed: bool,
}

pub fn availability_for(date: NaiveDate) -> DayAvailability {
    DayAvailability {
        date,
        time_slots: time_slots_for(date).to_vec(),
        is_weekend: date.weekday() == Weekday::Sat,
        is_closed: date.weekday() == Weekday::Sun,
    }
}

pub fn is_bookable(date: NaiveDate, time: &str) -> bool {
    time_slots_for(date).contains(&time)
}
