pub mod appointments;
pub mod chat;
pub mod clinics;
pub mod functions;
pub mod gamification;
pub mod health;
pub mod profiles;
pub mod reminders;
pub mod reviews;
pub mod slots;
pub mod staff;
pub mod templates;
