//! Credentials and endpoints for outbound integrations.
//!
//! ## Environment Variables
//!
//! - `WEBHOOK_URL`: WhatsApp automation webhook for outgoing messages
//! - `XAI_API_KEY`, `GROQ_API_KEY`, `DEEPINFRA_API_KEY`: AI provider keys
//! - `STATSIG_SERVER_KEY`: feature-flag server key; without it the default provider is used
//! - `RESEND_API_KEY`: transactional email key
//! - `EMAIL_FROM`: sender address (default: "Senhor Sorriso <onboarding@resend.dev>")
//! - `HTTP_TIMEOUT_MS`: timeout for every outbound request (default: 10000)
//! - `DEFAULT_AI_PROVIDER`: `groq`, `xai` or `deepinfra` (default: groq)

use std::{collections::HashMap, env};

use eyre::{Result, eyre};

use crate::ai::AiProvider;

pub const DEFAULT_EMAIL_FROM: &str = "Senhor Sorriso <onboarding@resend.dev>";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct IntegrationsConfig {
    pub webhook_url: Option<String>,
    pub xai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub deepinfra_api_key: Option<String>,
    pub statsig_server_key: Option<String>,
    pub resend_api_key: Option<String>,
    pub email_from: String,
    pub http_timeout_ms: u64,
    pub default_provider: AiProvider,
}

impl IntegrationsConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`IntegrationsConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http_timeout_ms = match non_empty("HTTP_TIMEOUT_MS") {
            Some(value) => value
                .parse()
                .map_err(|_| eyre!("Invalid HTTP_TIMEOUT_MS value: {}", value))?,
            None => DEFAULT_HTTP_TIMEOUT_MS,
        };

        let default_provider = match non_empty("DEFAULT_AI_PROVIDER") {
            Some(value) => value
                .parse()
                .map_err(|e: String| eyre!("Invalid DEFAULT_AI_PROVIDER: {}", e))?,
            None => AiProvider::default(),
        };

        Ok(Self {
            webhook_url: non_empty("WEBHOOK_URL"),
            xai_api_key: non_empty("XAI_API_KEY"),
            groq_api_key: non_empty("GROQ_API_KEY"),
            deepinfra_api_key: non_empty("DEEPINFRA_API_KEY"),
            statsig_server_key: non_empty("STATSIG_SERVER_KEY"),
            resend_api_key: non_empty("RESEND_API_KEY"),
            email_from: non_empty("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            http_timeout_ms,
            default_provider,
        })
    }

    /// API keys of the configured AI providers.
    pub fn provider_keys(&self) -> HashMap<AiProvider, String> {
        [
            (AiProvider::Groq, &self.groq_api_key),
            (AiProvider::Xai, &self.xai_api_key),
            (AiProvider::DeepInfra, &self.deepinfra_api_key),
        ]
        .into_iter()
        .filter_map(|(provider, key)| key.clone().map(|k| (provider, k)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lookup(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = IntegrationsConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.email_from, DEFAULT_EMAIL_FROM);
        assert_eq!(config.http_timeout_ms, DEFAULT_HTTP_TIMEOUT_MS);
        assert_eq!(config.default_provider, AiProvider::Groq);
        assert!(config.webhook_url.is_none());
        assert!(config.provider_keys().is_empty());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = IntegrationsConfig::from_lookup(lookup(&[("XAI_API_KEY", "  ")])).unwrap();
        assert!(config.xai_api_key.is_none());
    }

    #[test]
    fn reads_keys_and_provider() {
        let config = IntegrationsConfig::from_lookup(lookup(&[
            ("XAI_API_KEY", "xai-secret"),
            ("DEFAULT_AI_PROVIDER", "xai"),
            ("HTTP_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();
        assert_eq!(config.default_provider, AiProvider::Xai);
        assert_eq!(config.http_timeout_ms, 2500);
        assert_eq!(
            config.provider_keys().get(&AiProvider::Xai).map(String::as_str),
            Some("xai-secret")
        );
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(IntegrationsConfig::from_lookup(lookup(&[("DEFAULT_AI_PROVIDER", "openai")])).is_err());
    }
}
