use axum::{
    Json,
    extract::{Path, Query, State},
};
use sorriso_core::{
    catalog,
    errors::ClinicError,
    models::clinic::{Clinic, ClinicStats, DentalService, NearbyClinic, NearbyQuery, SearchQuery},
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

async fn load_clinics(pool: &PgPool) -> Result<Vec<Clinic>, AppError> {
    let rows = sorriso_db::repositories::clinic::list_clinics(pool)
        .await
        .map_err(ClinicError::Database)?;
    Ok(rows.into_iter().map(Clinic::from).collect())
}

async fn load_clinic(pool: &PgPool, id: &str) -> Result<Clinic, AppError> {
    let row = sorriso_db::repositories::clinic::get_clinic_by_id(pool, id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound(format!("Clinic {} not found", id)))?;
    Ok(Clinic::from(row))
}

#[axum::debug_handler]
pub async fn list_clinics(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<Clinic>>, AppError> {
    Ok(Json(load_clinics(&state.db_pool).await?))
}

#[axum::debug_handler]
pub async fn get_clinic(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Clinic>, AppError> {
    Ok(Json(load_clinic(&state.db_pool, &id).await?))
}

#[axum::debug_handler]
pub async fn search_clinics(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Clinic>>, AppError> {
    let clinics = load_clinics(&state.db_pool).await?;
    Ok(Json(catalog::search(&clinics, &query.q)))
}

#[axum::debug_handler]
pub async fn nearby_clinics(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<NearbyClinic>>, AppError> {
    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lng) {
        return Err(ClinicError::Validation("lat/lng out of range".to_string()).into());
    }
    let max_km = query.max_km.unwrap_or(catalog::DEFAULT_NEARBY_KM);
    if max_km <= 0.0 {
        return Err(ClinicError::Validation("max_km: must be positive".to_string()).into());
    }

    let clinics = load_clinics(&state.db_pool).await?;
    Ok(Json(catalog::nearest(&clinics, query.lat, query.lng, max_km)))
}

#[axum::debug_handler]
pub async fn clinic_services(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<DentalService>>, AppError> {
    let clinic = load_clinic(&state.db_pool, &id).await?;
    Ok(Json(catalog::clinic_services(&clinic)))
}

#[axum::debug_handler]
pub async fn clinic_stats(State(state): State<Arc<ApiState>>) -> Result<Json<ClinicStats>, AppError> {
    let clinics = load_clinics(&state.db_pool).await?;
    Ok(Json(catalog::clinic_stats(&clinics, &catalog::dental_services())))
}

pub async fn list_services() -> Json<Vec<DentalService>> {
    Json(catalog::dental_services())
}
