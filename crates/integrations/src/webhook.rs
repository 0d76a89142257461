//! Outgoing WhatsApp messages through the automation webhook.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::IntegrationError;

/// Payload accepted by the webhook workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMessage {
    pub phone: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub session_id: String,
    pub thread_id: String,
}

impl WebhookMessage {
    pub fn new(phone: impl Into<String>, message: impl Into<String>, session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        Self {
            phone: phone.into(),
            message: message.into(),
            name: None,
            thread_id: format!("thread_{}", session_id),
            session_id,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = thread_id.into();
        self
    }
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, message: &WebhookMessage) -> Result<(), IntegrationError>;
}

pub struct WebhookClient {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookClient {
    pub fn new(client: reqwest::Client, url: Option<String>) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl MessageSender for WebhookClient {
    async fn send(&self, message: &WebhookMessage) -> Result<(), IntegrationError> {
        let url = self
            .url
            .as_deref()
            .ok_or(IntegrationError::NotConfigured("WEBHOOK_URL"))?;

        tracing::debug!("Sending webhook message: session_id={}", message.session_id);

        let response = self
            .client
            .post(url)
            .json(message)
            .send()
            .await
            .map_err(IntegrationError::from_send)?;
        IntegrationError::check(response).await?;

        tracing::info!("Webhook message delivered: session_id={}", message.session_id);
        Ok(())
    }
}
