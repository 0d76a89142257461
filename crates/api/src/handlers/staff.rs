use axum::{Json, extract::State};
use sorriso_core::models::profile::{StaffLoginRequest, StaffLoginResponse};
use std::sync::Arc;

use crate::{
    ApiState,
    middleware::{auth, error_handling::AppError},
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<StaffLoginRequest>,
) -> Result<Json<StaffLoginResponse>, AppError> {
    let session = auth::authenticate_staff(&state.db_pool, &payload.username, &payload.password).await?;

    tracing::info!(
        "Staff login: {} (master: {}, clinic: {:?})",
        session.username,
        session.is_master,
        session.clinic_name
    );

    Ok(Json(session))
}
