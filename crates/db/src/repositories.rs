pub mod appointment;
pub mod clinic;
pub mod gamification;
pub mod message_template;
pub mod profile;
pub mod reminder;
pub mod review;
pub mod staff;
