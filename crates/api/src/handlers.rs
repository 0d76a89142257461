pub mod appointments;
pub mod chat;
pub mod clinics;
pub mod functions;
pub mod gamification;
pub mod profiles;
pub mod reminders;
pub mod reviews;
pub mod slots;
pub mod staff;
pub mod templates;

use chrono::{Local, NaiveDate};
use eyre::Report;

/// Calendar date at the clinics, used for "today" filters.
pub(crate) fn clinic_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Converts repository rows into domain models, failing on the first bad row.
pub(crate) fn convert_rows<R, M>(rows: Vec<R>) -> Result<Vec<M>, Report>
where
    M: TryFrom<R, Error = Report>,
{
    rows.into_iter().map(M::try_from).collect()
}
