//! Feature flags and dynamic configs.
//!
//! Only what the backend needs: reading one field of a dynamic config for a
//! user, and logging a numeric event.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::IntegrationError;

pub const STATSIG_API_URL: &str = "https://statsigapi.net/v1";
pub const STATSIG_EVENTS_URL: &str = "https://events.statsigapi.net/v1";

#[async_trait]
pub trait FeatureFlags: Send + Sync {
    /// Value of `field` in dynamic config `config` for `user_id`, if set.
    async fn config_value(
        &self,
        user_id: &str,
        config: &str,
        field: &str,
    ) -> Result<Option<Value>, IntegrationError>;

    async fn log_event(
        &self,
        user_id: &str,
        event: &str,
        value: f64,
        metadata: HashMap<String, String>,
    ) -> Result<(), IntegrationError>;
}

pub struct StatsigClient {
    client: reqwest::Client,
    server_key: String,
    api_url: String,
    events_url: String,
}

#[derive(Debug, Deserialize)]
struct ConfigResponse {
    #[serde(default)]
    value: Value,
}

impl StatsigClient {
    pub fn new(client: reqwest::Client, server_key: String) -> Self {
        Self::with_urls(client, server_key, STATSIG_API_URL, STATSIG_EVENTS_URL)
    }

    pub fn with_urls(client: reqwest::Client, server_key: String, api_url: &str, events_url: &str) -> Self {
        Self {
            client,
            server_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            events_url: events_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FeatureFlags for StatsigClient {
    async fn config_value(
        &self,
        user_id: &str,
        config: &str,
        field: &str,
    ) -> Result<Option<Value>, IntegrationError> {
        let response = self
            .client
            .post(format!("{}/get_config", self.api_url))
            .header("STATSIG-API-KEY", &self.server_key)
            .json(&json!({ "user": { "userID": user_id }, "configName": config }))
            .send()
            .await
            .map_err(IntegrationError::from_send)?;

        let body: ConfigResponse = IntegrationError::check(response)
            .await?
            .json()
            .await
            .map_err(|e| IntegrationError::Decode(e.to_string()))?;

        Ok(body.value.get(field).cloned())
    }

    async fn log_event(
        &self,
        user_id: &str,
        event: &str,
        value: f64,
        metadata: HashMap<String, String>,
    ) -> Result<(), IntegrationError> {
        let response = self
            .client
            .post(format!("{}/log_event", self.events_url))
            .header("STATSIG-API-KEY", &self.server_key)
            .json(&json!({
                "events": [{
                    "eventName": event,
                    "user": { "userID": user_id },
                    "value": value,
                    "metadata": metadata,
                }]
            }))
            .send()
            .await
            .map_err(IntegrationError::from_send)?;
        IntegrationError::check(response).await?;
        Ok(())
    }
}

/// Fixed config values, used when no flag service is configured.
#[derive(Debug, Default, Clone)]
pub struct StaticFlags {
    values: HashMap<(String, String), Value>,
}

impl StaticFlags {
    pub fn with_value(mut self, config: &str, field: &str, value: Value) -> Self {
        self.values.insert((config.to_string(), field.to_string()), value);
        self
    }
}

#[async_trait]
impl FeatureFlags for StaticFlags {
    async fn config_value(
        &self,
        _user_id: &str,
        config: &str,
        field: &str,
    ) -> Result<Option<Value>, IntegrationError> {
        Ok(self
            .values
            .get(&(config.to_string(), field.to_string()))
            .cloned())
    }

    async fn log_event(
        &self,
        user_id: &str,
        event: &str,
        value: f64,
        metadata: HashMap<String, String>,
    ) -> Result<(), IntegrationError> {
        tracing::debug!(user_id, event, value, ?metadata, "event");
        Ok(())
    }
}
