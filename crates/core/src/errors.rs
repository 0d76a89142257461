use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type ClinicResult<T> = Result<T, ClinicError>;

/// A single rejected field, collected by the validators in [`crate::validation`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl ClinicError {
    /// Folds a list of field errors into a single validation error, or `Ok(())` when empty.
    pub fn from_field_errors(errors: Vec<FieldError>) -> ClinicResult<()> {
        if errors.is_empty() {
            return Ok(());
        }

        let message = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");

        Err(ClinicError::Validation(message))
    }
}
