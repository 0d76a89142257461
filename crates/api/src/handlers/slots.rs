use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use sorriso_core::{
    errors::ClinicError,
    slots::{self, DayAvailability},
    validation::parse_iso_date,
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
    /// Stored clinic label; when given, already booked times are removed.
    pub clinic: Option<String>,
}

#[axum::debug_handler]
pub async fn get_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<DayAvailability>, AppError> {
    let date = parse_iso_date(&query.date).ok_or_else(|| {
        ClinicError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", query.date))
    })?;

    let mut availability = slots::availability_for(date);

    if let Some(clinic) = query.clinic.as_deref().filter(|c| !c.trim().is_empty()) {
        let booked = sorriso_db::repositories::appointment::booked_times(&state.db_pool, clinic, date)
            .await
            .map_err(ClinicError::Database)?;
        availability
            .time_slots
            .retain(|slot| !booked.iter().any(|taken| taken == slot));
    }

    Ok(Json(availability))
}
