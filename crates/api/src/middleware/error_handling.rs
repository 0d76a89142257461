//! # Error Handling Middleware
//!
//! Maps [`ClinicError`] to HTTP status codes and a `{"error": "..."}` JSON
//! body so every endpoint fails the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sorriso_core::errors::ClinicError;
use sorriso_integrations::IntegrationError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use sorriso_api::middleware::error_handling::AppError;
/// use sorriso_core::errors::ClinicError;
///
/// async fn handler(id: String) -> Result<Json<String>, AppError> {
///     if id.is_empty() {
///         return Err(AppError(ClinicError::Validation("id must not be empty".to_string())));
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ClinicError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ClinicError::Authorization(_) => StatusCode::FORBIDDEN,
            ClinicError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ClinicError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ClinicError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Allows `?` on `Result<T, ClinicError>` inside handlers.
impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError(err)
    }
}

/// Repository failures surface as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ClinicError::Database(err))
    }
}

impl From<IntegrationError> for AppError {
    fn from(err: IntegrationError) -> Self {
        AppError(err.into())
    }
}

/// Maps a ClinicError to an HTTP response
///
/// For handlers that build their response by hand instead of returning
/// `Result<_, AppError>`.
pub fn map_error(err: ClinicError) -> Response {
    AppError(err).into_response()
}
