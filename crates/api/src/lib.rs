//! # Sorriso API
//!
//! The API crate provides the web server for the Senhor Sorriso clinic
//! network: public booking, staff dashboards, patient profiles, the AI chat
//! bridge and the serverless-style function endpoints.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Services**: Workflows shared between handlers and the background binaries
//! - **Middleware**: Authentication helpers and error mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.
//! Outbound calls go through [`sorriso_integrations::Integrations`].

/// Configuration module for API settings
pub mod config;
/// In-process appointment change feed
pub mod events;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Messaging workflows shared with the binaries
pub mod services;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use sorriso_integrations::Integrations;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::events::EventBus;

/// Runtime knobs the handlers need from [`config::ApiConfig`].
#[derive(Debug, Clone, Default)]
pub struct ApiSettings {
    pub template_send_interval: Duration,
    /// Server-side request timeout. `Duration::ZERO` means none.
    pub request_timeout: Duration,
    pub clinic_notification_phone: Option<String>,
    pub xai_api_key: Option<String>,
}

impl From<&config::ApiConfig> for ApiSettings {
    fn from(config: &config::ApiConfig) -> Self {
        Self {
            template_send_interval: config.template_send_interval,
            request_timeout: Duration::from_secs(config.request_timeout),
            clinic_notification_phone: config.clinic_notification_phone.clone(),
            xai_api_key: config.integrations.xai_api_key.clone(),
        }
    }
}

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```rust,ignore
/// let state = Arc::new(ApiState::new(db_pool, integrations, ApiSettings::default()));
/// let app = build_router(state);
/// ```
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Webhook, email and AI clients
    pub integrations: Integrations,
    /// Appointment change feed for realtime dashboards
    pub events: EventBus,
    pub settings: ApiSettings,
}

impl ApiState {
    pub fn new(db_pool: PgPool, integrations: Integrations, settings: ApiSettings) -> Self {
        Self {
            db_pool,
            integrations,
            events: EventBus::default(),
            settings,
        }
    }
}

/// Builds the application router with every route attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Opening hours
        .merge(routes::slots::routes())
        // Booking and staff dashboard endpoints
        .merge(routes::appointments::routes())
        .merge(routes::staff::routes())
        // Patient accounts
        .merge(routes::profiles::routes())
        .merge(routes::gamification::routes())
        // Clinic catalog and reviews
        .merge(routes::clinics::routes())
        .merge(routes::reviews::routes())
        // Messaging
        .merge(routes::templates::routes())
        .merge(routes::reminders::routes())
        .merge(routes::chat::routes())
        // Function-style endpoints used by the frontend and schedulers
        .merge(routes::functions::routes())
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server with the provided configuration and database connection
///
/// Installs the log subscriber, builds the outbound clients from
/// `config.integrations`, and serves until the listener fails.
///
/// # Example
///
/// ```rust,ignore
/// let config = ApiConfig::from_env()?;
/// let db_pool = sorriso_db::create_pool(&config.database_url).await?;
/// start_server(config, db_pool).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let integrations = Integrations::from_config(&config.integrations)?;
    let state = Arc::new(ApiState::new(db_pool, integrations, ApiSettings::from(&config)));

    let app = build_router(state).layer(TraceLayer::new_for_http());

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Bounds the time until response headers; SSE bodies keep streaming.
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
