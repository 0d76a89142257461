pub mod messaging;
pub mod reminders;
