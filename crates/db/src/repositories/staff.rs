use eyre::Result;
use sqlx::{Pool, Postgres};

use crate::models::DbStaffAccount;

pub async fn get_staff_account(pool: &Pool<Postgres>, username: &str) -> Result<Option<DbStaffAccount>> {
    tracing::debug!("Getting staff account: {}", username);

    let row = sqlx::query_as::<_, DbStaffAccount>(
        r#"
        SELECT username, password_hash, clinic_name, is_master, created_at
        FROM staff_accounts
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Creates the account or replaces its password and clinic.
pub async fn upsert_staff_account(
    pool: &Pool<Postgres>,
    username: &str,
    password_hash: &str,
    clinic_name: Option<&str>,
    is_master: bool,
) -> Result<DbStaffAccount> {
    tracing::debug!("Upserting staff account: username={}, is_master={}", username, is_master);

    let row = sqlx::query_as::<_, DbStaffAccount>(
        r#"
        INSERT INTO staff_accounts (username, password_hash, clinic_name, is_master)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (username) DO UPDATE SET
            password_hash = EXCLUDED.password_hash,
            clinic_name = EXCLUDED.clinic_name,
            is_master = EXCLUDED.is_master
        RETURNING username, password_hash, clinic_name, is_master, created_at
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(clinic_name)
    .bind(is_master)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
