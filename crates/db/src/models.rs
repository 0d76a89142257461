//! Row types as stored in Postgres, and their conversion into domain models.
//!
//! Enumerations are kept as text columns; a row holding an unknown value is
//! reported as an error rather than silently mapped.

use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Report, eyre};
use serde::{Deserialize, Serialize};
use sorriso_core::models::{
    appointment::Appointment,
    clinic::Clinic,
    gamification::{Achievement, Badge, Progress},
    profile::Profile,
    reminder::Reminder,
    review::Review,
    template::MessageTemplate,
};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub clinic: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
    pub notes: Option<String>,
    pub source: String,
    pub webhook_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = Report;

    fn try_from(row: DbAppointment) -> Result<Self, Self::Error> {
        Ok(Appointment {
            status: row.status.parse().map_err(|e: String| eyre!(e))?,
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            clinic: row.clinic,
            service: row.service,
            date: row.date,
            time: row.time,
            notes: row.notes,
            source: row.source,
            webhook_session_id: row.webhook_session_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfile {
    pub id: Uuid,
    pub auth_user_id: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub theme: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbProfile> for Profile {
    type Error = Report;

    fn try_from(row: DbProfile) -> Result<Self, Self::Error> {
        Ok(Profile {
            theme: row.theme.parse().map_err(|e: String| eyre!(e))?,
            id: row.id,
            auth_user_id: row.auth_user_id,
            full_name: row.full_name,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClinic {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub full_address: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
    pub available: bool,
    pub services: Vec<String>,
    pub specialties: Vec<String>,
    pub working_hours: String,
    pub team: String,
}

impl From<DbClinic> for Clinic {
    fn from(row: DbClinic) -> Self {
        Clinic {
            id: row.id,
            name: row.name,
            city: row.city,
            state: row.state,
            address: row.address,
            full_address: row.full_address,
            phone: row.phone,
            whatsapp: row.whatsapp,
            email: row.email,
            latitude: row.latitude,
            longitude: row.longitude,
            available: row.available,
            services: row.services,
            specialties: row.specialties,
            working_hours: row.working_hours,
            team: row.team,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReview {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub user_id: String,
    pub clinic_id: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbReview> for Review {
    fn from(row: DbReview) -> Self {
        Review {
            id: row.id,
            appointment_id: row.appointment_id,
            user_id: row.user_id,
            clinic_id: row.clinic_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMessageTemplate {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub subject: String,
    pub content: String,
    pub variables: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbMessageTemplate> for MessageTemplate {
    type Error = Report;

    fn try_from(row: DbMessageTemplate) -> Result<Self, Self::Error> {
        Ok(MessageTemplate {
            category: row.category.parse().map_err(|e: String| eyre!(e))?,
            id: row.id,
            name: row.name,
            subject: row.subject,
            content: row.content,
            variables: row.variables,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbProgress {
    pub user_id: String,
    pub total_points: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub recent_achievements: Json<Vec<Achievement>>,
    pub updated_at: DateTime<Utc>,
}

fn non_negative(value: i32, column: &str) -> eyre::Result<u32> {
    u32::try_from(value).map_err(|_| eyre!("negative {} in gamification_progress", column))
}

impl TryFrom<DbProgress> for Progress {
    type Error = Report;

    fn try_from(row: DbProgress) -> Result<Self, Self::Error> {
        let mut progress = Progress::new(row.user_id);
        progress.total_points = non_negative(row.total_points, "total_points")?;
        progress.level = sorriso_core::gamification::level_for(progress.total_points);
        progress.next_level_points = progress.level * sorriso_core::gamification::POINTS_PER_LEVEL;
        progress.current_streak = non_negative(row.current_streak, "current_streak")?;
        progress.longest_streak = non_negative(row.longest_streak, "longest_streak")?;
        progress.recent_achievements = row.recent_achievements.0;
        Ok(progress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBadge {
    pub id: Uuid,
    pub user_id: String,
    pub badge_key: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub earned_at: DateTime<Utc>,
}

impl From<DbBadge> for Badge {
    fn from(row: DbBadge) -> Self {
        Badge {
            id: Some(row.id),
            user_id: row.user_id,
            badge_key: row.badge_key,
            name: row.name,
            description: row.description,
            icon: row.icon,
            earned: true,
            earned_at: Some(row.earned_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReminder {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub reminder_type: String,
    pub method: String,
    pub status: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbReminder> for Reminder {
    type Error = Report;

    fn try_from(row: DbReminder) -> Result<Self, Self::Error> {
        Ok(Reminder {
            id: row.id,
            appointment_id: row.appointment_id,
            kind: row.reminder_type.parse().map_err(|e: String| eyre!(e))?,
            method: row.method.parse().map_err(|e: String| eyre!(e))?,
            status: row.status.parse().map_err(|e: String| eyre!(e))?,
            sent_at: row.sent_at,
            created_at: row.created_at,
        })
    }
}

/// A pending reminder joined with the appointment it refers to.
#[derive(Debug, Clone, FromRow)]
pub struct DbPendingReminder {
    pub reminder_id: Uuid,
    pub reminder_type: String,
    pub method: String,
    #[sqlx(flatten)]
    pub appointment: DbAppointment,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStaffAccount {
    pub username: String,
    pub password_hash: String,
    pub clinic_name: Option<String>,
    pub is_master: bool,
    pub created_at: DateTime<Utc>,
}
