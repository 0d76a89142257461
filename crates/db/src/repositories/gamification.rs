use chrono::Utc;
use eyre::{Result, eyre};
use sorriso_core::{gamification::BadgeDefinition, models::gamification::Progress};
use sqlx::{Pool, Postgres, types::Json};
use uuid::Uuid;

use crate::models::{DbBadge, DbProgress};

pub async fn get_progress(pool: &Pool<Postgres>, user_id: &str) -> Result<Option<DbProgress>> {
    tracing::debug!("Getting gamification progress for user: {}", user_id);

    let row = sqlx::query_as::<_, DbProgress>(
        r#"
        SELECT user_id, total_points, current_streak, longest_streak, recent_achievements, updated_at
        FROM gamification_progress
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

fn as_column(value: u32, column: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| eyre!("{} out of range: {}", column, value))
}

/// Writes the whole progress record, creating it on first use.
pub async fn save_progress(pool: &Pool<Postgres>, progress: &Progress) -> Result<DbProgress> {
    tracing::debug!(
        "Saving gamification progress: user_id={}, points={}, streak={}",
        progress.user_id, progress.total_points, progress.current_streak
    );

    let row = sqlx::query_as::<_, DbProgress>(
        r#"
        INSERT INTO gamification_progress
            (user_id, total_points, current_streak, longest_streak, recent_achievements, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE SET
            total_points = EXCLUDED.total_points,
            current_streak = EXCLUDED.current_streak,
            longest_streak = EXCLUDED.longest_streak,
            recent_achievements = EXCLUDED.recent_achievements,
            updated_at = EXCLUDED.updated_at
        RETURNING user_id, total_points, current_streak, longest_streak, recent_achievements, updated_at
        "#,
    )
    .bind(&progress.user_id)
    .bind(as_column(progress.total_points, "total_points")?)
    .bind(as_column(progress.current_streak, "current_streak")?)
    .bind(as_column(progress.longest_streak, "longest_streak")?)
    .bind(Json(&progress.recent_achievements))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn list_badges(pool: &Pool<Postgres>, user_id: &str) -> Result<Vec<DbBadge>> {
    let rows = sqlx::query_as::<_, DbBadge>(
        r#"
        SELECT id, user_id, badge_key, name, description, icon, earned_at
        FROM gamification_badges
        WHERE user_id = $1
        ORDER BY earned_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Awards a badge once. Returns `None` when the user already had it.
pub async fn award_badge(
    pool: &Pool<Postgres>,
    user_id: &str,
    badge: &BadgeDefinition,
) -> Result<Option<DbBadge>> {
    tracing::debug!("Awarding badge: user_id={}, badge={}", user_id, badge.key);

    let row = sqlx::query_as::<_, DbBadge>(
        r#"
        INSERT INTO gamification_badges (id, user_id, badge_key, name, description, icon, earned_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id, badge_key) DO NOTHING
        RETURNING id, user_id, badge_key, name, description, icon, earned_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(badge.key)
    .bind(badge.name)
    .bind(badge.description)
    .bind(badge.icon)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
