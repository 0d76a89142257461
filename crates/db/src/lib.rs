//! Postgres persistence for clinics, appointments, profiles and the patient extras.

pub mod models;
pub mod repositories;
pub mod schema;

use eyre::{Result, WrapErr};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

const MAX_CONNECTIONS: u32 = 5;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
        .wrap_err("Failed to connect to the Sorriso database")?;

    tracing::debug!("Database pool ready (max {} connections)", MAX_CONNECTIONS);
    Ok(pool)
}
