//! AI text completion with per-user provider selection.
//!
//! The provider comes from the `llm_provider` dynamic config (field
//! `provider`) and falls back to the configured default. All three providers
//! expose an OpenAI-compatible chat completions endpoint.

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc, time::Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use sorriso_core::models::chat::CompletionResponse;

use crate::{error::IntegrationError, flags::FeatureFlags};

pub const PROVIDER_CONFIG: &str = "llm_provider";
pub const PROVIDER_FIELD: &str = "provider";
pub const INFERENCE_EVENT: &str = "ai_inference";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AiProvider {
    #[default]
    Groq,
    Xai,
    DeepInfra,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::Groq => "groq",
            AiProvider::Xai => "xai",
            AiProvider::DeepInfra => "deepinfra",
        }
    }

    pub fn model(&self) -> &'static str {
        match self {
            AiProvider::Groq => "mixtral-8x7b-32768",
            AiProvider::Xai => "grok-2",
            AiProvider::DeepInfra => "llama3-70b",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            AiProvider::Groq => "https://api.groq.com/openai/v1/chat/completions",
            AiProvider::Xai => "https://api.x.ai/v1/chat/completions",
            AiProvider::DeepInfra => "https://api.deepinfra.com/v1/openai/chat/completions",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(AiProvider::Groq),
            "xai" => Ok(AiProvider::Xai),
            "deepinfra" => Ok(AiProvider::DeepInfra),
            other => Err(format!("unknown AI provider '{}'", other)),
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, provider: AiProvider, prompt: &str) -> Result<String, IntegrationError>;
}

pub struct HttpCompletionClient {
    client: reqwest::Client,
    keys: HashMap<AiProvider, String>,
    endpoints: HashMap<AiProvider, String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl HttpCompletionClient {
    pub fn new(client: reqwest::Client, keys: HashMap<AiProvider, String>) -> Self {
        Self {
            client,
            keys,
            endpoints: HashMap::new(),
        }
    }

    /// Overrides the endpoint used for `provider`.
    pub fn with_endpoint(mut self, provider: AiProvider, url: impl Into<String>) -> Self {
        self.endpoints.insert(provider, url.into());
        self
    }

    fn endpoint(&self, provider: AiProvider) -> &str {
        self.endpoints
            .get(&provider)
            .map(String::as_str)
            .unwrap_or_else(|| provider.endpoint())
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, provider: AiProvider, prompt: &str) -> Result<String, IntegrationError> {
        let key = self.keys.get(&provider).ok_or(match provider {
            AiProvider::Groq => IntegrationError::NotConfigured("GROQ_API_KEY"),
            AiProvider::Xai => IntegrationError::NotConfigured("XAI_API_KEY"),
            AiProvider::DeepInfra => IntegrationError::NotConfigured("DEEPINFRA_API_KEY"),
        })?;

        let response = self
            .client
            .post(self.endpoint(provider))
            .bearer_auth(key)
            .json(&json!({
                "model": provider.model(),
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await
            .map_err(IntegrationError::from_send)?;

        let completion: ChatCompletion = IntegrationError::check(response)
            .await?
            .json()
            .await
            .map_err(|e| IntegrationError::Decode(e.to_string()))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

/// Picks a provider per user and runs the completion.
pub struct AiRouter {
    flags: Arc<dyn FeatureFlags>,
    client: Arc<dyn CompletionClient>,
    default_provider: AiProvider,
}

impl AiRouter {
    pub fn new(
        flags: Arc<dyn FeatureFlags>,
        client: Arc<dyn CompletionClient>,
        default_provider: AiProvider,
    ) -> Self {
        Self {
            flags,
            client,
            default_provider,
        }
    }

    /// Provider for `user_id`. Flag lookup failures and unknown names fall back to the default.
    pub async fn provider_for(&self, user_id: &str) -> AiProvider {
        match self.flags.config_value(user_id, PROVIDER_CONFIG, PROVIDER_FIELD).await {
            Ok(Some(value)) => value
                .as_str()
                .and_then(|name| name.parse().ok())
                .unwrap_or(self.default_provider),
            Ok(None) => self.default_provider,
            Err(e) => {
                tracing::warn!("Provider lookup failed, using {}: {}", self.default_provider, e);
                self.default_provider
            }
        }
    }

    pub async fn complete(&self, prompt: &str, user_id: &str) -> Result<CompletionResponse, IntegrationError> {
        let provider = self.provider_for(user_id).await;

        let start = Instant::now();
        let text = self.client.complete(provider, prompt).await?;
        let elapsed_ms = start.elapsed().as_millis() as f64;

        tracing::info!(provider = provider.as_str(), elapsed_ms, "AI completion finished");

        let metadata = HashMap::from([("provider".to_string(), provider.to_string())]);
        if let Err(e) = self
            .flags
            .log_event(user_id, INFERENCE_EVENT, elapsed_ms, metadata)
            .await
        {
            tracing::warn!("Failed to log inference event: {}", e);
        }

        Ok(CompletionResponse {
            text,
            provider: provider.to_string(),
        })
    }
}
