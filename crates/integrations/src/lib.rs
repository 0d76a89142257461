//! # Sorriso Integrations
//!
//! Clients for the services the clinic backend talks to over HTTP: the
//! WhatsApp automation webhook, the feature-flag service that picks the AI
//! provider, the AI completion endpoints and the transactional email API.
//!
//! Every client sits behind a trait so the API can be exercised without
//! network access.

pub mod ai;
pub mod config;
pub mod email;
pub mod error;
pub mod flags;
pub mod webhook;

use std::{sync::Arc, time::Duration};

use eyre::{Result, WrapErr};

pub use error::IntegrationError;

/// The set of outbound clients shared by the API handlers.
#[derive(Clone)]
pub struct Integrations {
    pub messages: Arc<dyn webhook::MessageSender>,
    pub mailer: Arc<dyn email::Mailer>,
    pub ai: Arc<ai::AiRouter>,
}

impl Integrations {
    /// Builds the HTTP-backed clients. Services without credentials are
    /// still constructed and fail with [`IntegrationError::NotConfigured`] when used.
    pub fn from_config(config: &config::IntegrationsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .build()
            .wrap_err("Failed to build HTTP client")?;

        let messages = Arc::new(webhook::WebhookClient::new(http.clone(), config.webhook_url.clone()));
        let mailer = Arc::new(email::ResendMailer::new(
            http.clone(),
            config.resend_api_key.clone(),
            config.email_from.clone(),
        ));

        let flags: Arc<dyn flags::FeatureFlags> = match &config.statsig_server_key {
            Some(key) => Arc::new(flags::StatsigClient::new(http.clone(), key.clone())),
            None => Arc::new(flags::StaticFlags::default()),
        };
        let completions = Arc::new(ai::HttpCompletionClient::new(http, config.provider_keys()));
        let ai = Arc::new(ai::AiRouter::new(flags, completions, config.default_provider));

        Ok(Self { messages, mailer, ai })
    }
}
