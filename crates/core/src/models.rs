pub mod appointment;
pub mod chat;
pub mod clinic;
pub mod functions;
pub mod gamification;
pub mod profile;
pub mod reminder;
pub mod review;
pub mod template;
