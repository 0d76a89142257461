use sorriso_core::errors::ClinicError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl IntegrationError {
    pub(crate) fn from_send(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            IntegrationError::Timeout
        } else {
            IntegrationError::Request(error)
        }
    }

    /// Turns a non-2xx response into [`IntegrationError::Api`].
    pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response, Self> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(IntegrationError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl From<IntegrationError> for ClinicError {
    fn from(error: IntegrationError) -> Self {
        ClinicError::Upstream(error.to_string())
    }
}
