use eyre::Result;
use sorriso_core::models::clinic::Clinic;
use sqlx::{Pool, Postgres};

use crate::models::DbClinic;

const COLUMNS: &str = "id, name, city, state, address, full_address, phone, whatsapp, email, latitude, longitude, available, services, specialties, working_hours, team";

pub async fn upsert_clinic(pool: &Pool<Postgres>, clinic: &Clinic) -> Result<DbClinic> {
    tracing::debug!("Upserting clinic: id={}", clinic.id);

    let row = sqlx::query_as::<_, DbClinic>(&format!(
        r#"
        INSERT INTO clinics ({COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            city = EXCLUDED.city,
            state = EXCLUDED.state,
            address = EXCLUDED.address,
            full_address = EXCLUDED.full_address,
            phone = EXCLUDED.phone,
            whatsapp = EXCLUDED.whatsapp,
            email = EXCLUDED.email,
            latitude = EXCLUDED.latitude,
            longitude = EXCLUDED.longitude,
            services = EXCLUDED.services,
            specialties = EXCLUDED.specialties,
            working_hours = EXCLUDED.working_hours,
            team = EXCLUDED.team
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&clinic.id)
    .bind(&clinic.name)
    .bind(&clinic.city)
    .bind(&clinic.state)
    .bind(&clinic.address)
    .bind(&clinic.full_address)
    .bind(&clinic.phone)
    .bind(&clinic.whatsapp)
    .bind(&clinic.email)
    .bind(clinic.latitude)
    .bind(clinic.longitude)
    .bind(clinic.available)
    .bind(&clinic.services)
    .bind(&clinic.specialties)
    .bind(&clinic.working_hours)
    .bind(&clinic.team)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn list_clinics(pool: &Pool<Postgres>) -> Result<Vec<DbClinic>> {
    let rows = sqlx::query_as::<_, DbClinic>(&format!(
        "SELECT {COLUMNS} FROM clinics ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_clinic_by_id(pool: &Pool<Postgres>, id: &str) -> Result<Option<DbClinic>> {
    tracing::debug!("Getting clinic by id: {}", id);

    let row = sqlx::query_as::<_, DbClinic>(&format!(
        "SELECT {COLUMNS} FROM clinics WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
