//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, with defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `TEMPLATE_SEND_INTERVAL_MS`: Pause between bulk message recipients (default: 1000)
//! - `CLINIC_NOTIFICATION_PHONE`: WhatsApp number told about every new booking
//!
//! Outbound integration settings are documented in
//! [`sorriso_integrations::config`].

use eyre::{Result, WrapErr, eyre};
use sorriso_integrations::config::IntegrationsConfig;
use std::{env, time::Duration};
use tracing::Level;

/// Configuration for the Sorriso API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use sorriso_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Pause between recipients when sending a template to many appointments
    pub template_send_interval: Duration,

    /// Clinic-side WhatsApp number notified of new bookings (optional)
    pub clinic_notification_phone: Option<String>,

    pub integrations: IntegrationsConfig,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - An integration setting is malformed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Messaging settings
        let template_send_interval = Duration::from_millis(
            lookup("TEMPLATE_SEND_INTERVAL_MS")
                .unwrap_or_else(|| "1000".to_string())
                .parse()
                .wrap_err("Invalid TEMPLATE_SEND_INTERVAL_MS value")?,
        );
        let clinic_notification_phone =
            lookup("CLINIC_NOTIFICATION_PHONE").filter(|p| !p.trim().is_empty());

        let integrations = IntegrationsConfig::from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            template_send_interval,
            clinic_notification_phone,
            integrations,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
