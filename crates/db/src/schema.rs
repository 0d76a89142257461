use eyre::Result;
use sorriso_core::catalog;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::repositories::clinic;

const TABLES: [(&str, &str); 9] = [
    (
        "profiles",
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            auth_user_id VARCHAR(255) NOT NULL UNIQUE,
            full_name VARCHAR(100) NOT NULL,
            phone VARCHAR(20) NULL,
            theme VARCHAR(10) NOT NULL DEFAULT 'auto',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_theme CHECK (theme IN ('light', 'dark', 'auto'))
        );
        "#,
    ),
    (
        "clinics",
        r#"
        CREATE TABLE IF NOT EXISTS clinics (
            id VARCHAR(64) PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            city VARCHAR(255) NOT NULL,
            state CHAR(2) NOT NULL,
            address VARCHAR(255) NOT NULL,
            full_address VARCHAR(512) NOT NULL,
            phone VARCHAR(20) NOT NULL,
            whatsapp VARCHAR(20) NOT NULL,
            email VARCHAR(255) NOT NULL,
            latitude DOUBLE PRECISION NOT NULL,
            longitude DOUBLE PRECISION NOT NULL,
            available BOOLEAN NOT NULL DEFAULT TRUE,
            services TEXT[] NOT NULL DEFAULT '{}',
            specialties TEXT[] NOT NULL DEFAULT '{}',
            working_hours VARCHAR(255) NOT NULL,
            team VARCHAR(255) NOT NULL
        );
        "#,
    ),
    (
        "appointments",
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(100) NOT NULL,
            phone VARCHAR(20) NOT NULL,
            email VARCHAR(255) NULL,
            clinic VARCHAR(255) NOT NULL,
            service VARCHAR(255) NOT NULL,
            date DATE NOT NULL,
            time VARCHAR(5) NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'confirmed',
            notes TEXT NULL,
            source VARCHAR(20) NOT NULL DEFAULT 'pwa',
            webhook_session_id VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('pending', 'confirmed', 'completed', 'cancelled'))
        );
        "#,
    ),
    (
        "reviews",
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            appointment_id UUID NOT NULL REFERENCES appointments(id) ON DELETE CASCADE,
            user_id VARCHAR(255) NOT NULL,
            clinic_id VARCHAR(64) NOT NULL,
            rating SMALLINT NOT NULL,
            comment TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_rating CHECK (rating BETWEEN 1 AND 5),
            CONSTRAINT one_review_per_user UNIQUE (appointment_id, user_id)
        );
        "#,
    ),
    (
        "message_templates",
        r#"
        CREATE TABLE IF NOT EXISTS message_templates (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            category VARCHAR(20) NOT NULL,
            subject VARCHAR(255) NOT NULL DEFAULT '',
            content TEXT NOT NULL,
            variables TEXT[] NOT NULL DEFAULT '{}',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "gamification_progress",
        r#"
        CREATE TABLE IF NOT EXISTS gamification_progress (
            user_id VARCHAR(255) PRIMARY KEY,
            total_points INTEGER NOT NULL DEFAULT 0,
            current_streak INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0,
            recent_achievements JSONB NOT NULL DEFAULT '[]',
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "gamification_badges",
        r#"
        CREATE TABLE IF NOT EXISTS gamification_badges (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id VARCHAR(255) NOT NULL,
            badge_key VARCHAR(64) NOT NULL,
            name VARCHAR(255) NOT NULL,
            description VARCHAR(255) NOT NULL,
            icon VARCHAR(16) NOT NULL,
            earned_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT one_badge_per_user UNIQUE (user_id, badge_key)
        );
        "#,
    ),
    (
        "reminders",
        r#"
        CREATE TABLE IF NOT EXISTS reminders (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            appointment_id UUID NOT NULL REFERENCES appointments(id) ON DELETE CASCADE,
            reminder_type VARCHAR(10) NOT NULL,
            method VARCHAR(10) NOT NULL,
            status VARCHAR(10) NOT NULL DEFAULT 'pending',
            sent_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_reminder_type CHECK (reminder_type IN ('24h', '2h', '30min')),
            CONSTRAINT valid_method CHECK (method IN ('whatsapp', 'push')),
            CONSTRAINT valid_reminder_status CHECK (status IN ('pending', 'sent', 'failed'))
        );
        "#,
    ),
    (
        "staff_accounts",
        r#"
        CREATE TABLE IF NOT EXISTS staff_accounts (
            username VARCHAR(64) PRIMARY KEY,
            password_hash VARCHAR(255) NOT NULL,
            clinic_name VARCHAR(255) NULL,
            is_master BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
];

const INDEXES: [&str; 6] = [
    "CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(date);",
    "CREATE INDEX IF NOT EXISTS idx_appointments_clinic ON appointments(clinic);",
    "CREATE INDEX IF NOT EXISTS idx_appointments_phone ON appointments(phone);",
    "CREATE INDEX IF NOT EXISTS idx_reviews_clinic_id ON reviews(clinic_id);",
    "CREATE INDEX IF NOT EXISTS idx_reminders_status ON reminders(status);",
    "CREATE INDEX IF NOT EXISTS idx_gamification_badges_user_id ON gamification_badges(user_id);",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for (table, ddl) in TABLES {
        tracing::debug!("Creating table {}", table);
        sqlx::query(ddl).execute(pool).await?;
    }

    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    seed_clinics(pool).await?;

    info!("Database schema initialized successfully.");
    Ok(())
}

/// Inserts the catalog clinics, refreshing rows that already exist.
pub async fn seed_clinics(pool: &Pool<Postgres>) -> Result<()> {
    let clinics = catalog::default_clinics();
    for clinic in &clinics {
        clinic::upsert_clinic(pool, clinic).await?;
    }
    info!("Seeded {} clinics", clinics.len());
    Ok(())
}
