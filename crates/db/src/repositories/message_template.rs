use chrono::Utc;
use eyre::Result;
use sorriso_core::models::template::{TemplateCategory, UpdateTemplateRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::DbMessageTemplate;

const COLUMNS: &str = "id, name, category, subject, content, variables, is_active, created_at";

pub async fn create_template(
    pool: &Pool<Postgres>,
    name: &str,
    category: TemplateCategory,
    subject: &str,
    content: &str,
    variables: &[String],
    is_active: bool,
) -> Result<DbMessageTemplate> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating message template: id={}, name={}, category={}", id, name, category);

    let row = sqlx::query_as::<_, DbMessageTemplate>(&format!(
        r#"
        INSERT INTO message_templates (id, name, category, subject, content, variables, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(category.as_str())
    .bind(subject)
    .bind(content)
    .bind(variables)
    .bind(is_active)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_template_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbMessageTemplate>> {
    let row = sqlx::query_as::<_, DbMessageTemplate>(&format!(
        "SELECT {COLUMNS} FROM message_templates WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn list_templates(pool: &Pool<Postgres>) -> Result<Vec<DbMessageTemplate>> {
    let rows = sqlx::query_as::<_, DbMessageTemplate>(&format!(
        "SELECT {COLUMNS} FROM message_templates ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Newest active template of `category`, if any.
pub async fn find_active_by_category(
    pool: &Pool<Postgres>,
    category: TemplateCategory,
) -> Result<Option<DbMessageTemplate>> {
    let row = sqlx::query_as::<_, DbMessageTemplate>(&format!(
        r#"
        SELECT {COLUMNS} FROM message_templates
        WHERE category = $1 AND is_active
        ORDER BY created_at DESC
        LIMIT 1
        "#
    ))
    .bind(category.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// `variables` must be recomputed by the caller whenever the content changes.
pub async fn update_template(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: &UpdateTemplateRequest,
    variables: Option<&[String]>,
) -> Result<Option<DbMessageTemplate>> {
    tracing::debug!("Updating message template: id={}", id);

    let row = sqlx::query_as::<_, DbMessageTemplate>(&format!(
        r#"
        UPDATE message_templates
        SET name = COALESCE($2, name),
            category = COALESCE($3, category),
            subject = COALESCE($4, subject),
            content = COALESCE($5, content),
            variables = COALESCE($6, variables),
            is_active = COALESCE($7, is_active)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.name)
    .bind(changes.category.map(|c| c.as_str()))
    .bind(&changes.subject)
    .bind(&changes.content)
    .bind(variables)
    .bind(changes.is_active)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_template(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM message_templates WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
