use chrono::Utc;
use eyre::Result;
use sorriso_core::theme::ThemePreference;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::DbProfile;

const COLUMNS: &str = "id, auth_user_id, full_name, phone, theme, created_at, updated_at";

pub async fn create_profile(
    pool: &Pool<Postgres>,
    auth_user_id: &str,
    full_name: &str,
    phone: Option<&str>,
) -> Result<DbProfile> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating profile: id={}, auth_user_id={}", id, auth_user_id);

    let row = sqlx::query_as::<_, DbProfile>(&format!(
        r#"
        INSERT INTO profiles (id, auth_user_id, full_name, phone, theme, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(auth_user_id)
    .bind(full_name)
    .bind(phone)
    .bind(ThemePreference::default().as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_profile(pool: &Pool<Postgres>, auth_user_id: &str) -> Result<Option<DbProfile>> {
    tracing::debug!("Getting profile for auth user: {}", auth_user_id);

    let row = sqlx::query_as::<_, DbProfile>(&format!(
        "SELECT {COLUMNS} FROM profiles WHERE auth_user_id = $1"
    ))
    .bind(auth_user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Updates the given fields, leaving `None` ones untouched.
pub async fn update_profile(
    pool: &Pool<Postgres>,
    auth_user_id: &str,
    full_name: Option<&str>,
    phone: Option<&str>,
) -> Result<Option<DbProfile>> {
    let row = sqlx::query_as::<_, DbProfile>(&format!(
        r#"
        UPDATE profiles
        SET full_name = COALESCE($2, full_name),
            phone = COALESCE($3, phone),
            updated_at = $4
        WHERE auth_user_id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(auth_user_id)
    .bind(full_name)
    .bind(phone)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn update_theme(
    pool: &Pool<Postgres>,
    auth_user_id: &str,
    theme: ThemePreference,
) -> Result<Option<DbProfile>> {
    tracing::debug!("Updating theme: auth_user_id={}, theme={}", auth_user_id, theme);

    let row = sqlx::query_as::<_, DbProfile>(&format!(
        r#"
        UPDATE profiles SET theme = $2, updated_at = $3
        WHERE auth_user_id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(auth_user_id)
    .bind(theme.as_str())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
