//! # Sorriso Core
//!
//! Domain types and the pure logic shared by the API, the database layer and
//! the integrations: opening-hours slots, dashboard filters, validation,
//! message templates, chatbot output parsing and the clinic catalog.
//!
//! Nothing in this crate performs I/O.

pub mod catalog;
pub mod chat;
pub mod errors;
pub mod filters;
pub mod gamification;
pub mod models;
pub mod reminders;
pub mod reviews;
pub mod slots;
pub mod stats;
pub mod templates;
pub mod theme;
pub mod validation;
