use crate::errors::{ClinicError, ClinicResult};
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::review::Review;

pub use crate::models::review::ReviewStats;

/// A patient may review an appointment once, and only after it was completed.
pub fn can_user_review(appointment: &Appointment, user_id: &str, existing: &[Review]) -> bool {
    appointment.status == AppointmentStatus::Completed
        && !existing
            .iter()
            .any(|r| r.appointment_id == appointment.id && r.user_id == user_id)
}

/// Same check as [`can_user_review`], reported as an error the API can return.
pub fn ensure_can_review(appointment: &Appointment, user_id: &str, existing: &[Review]) -> ClinicResult<()> {
    if appointment.status != AppointmentStatus::Completed {
        return Err(ClinicError::Validation(
            "only completed appointments can be reviewed".to_string(),
        ));
    }
    if !can_user_review(appointment, user_id, existing) {
        return Err(ClinicError::Validation(
            "appointment already reviewed by this user".to_string(),
        ));
    }
    Ok(())
}
