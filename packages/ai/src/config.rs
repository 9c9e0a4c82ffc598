// ABOUTME: Gateway configuration loaded from the environment
// ABOUTME: Credentials, endpoint, model names, thinking budget and media job timing

use blueprint_config as env_vars;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_DOCUMENT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_TIP_MODEL: &str = "gemini-2.5-flash-lite-latest";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";
pub const DEFAULT_THINKING_BUDGET: u32 = 32768;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_VIDEO_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_VIDEO_TIMEOUT_SECS: u64 = 600;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' is not a non-negative integer")]
    InvalidNumber { var: String, value: String },
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub document_model: String,
    pub tip_model: String,
    pub image_model: String,
    pub video_model: String,
    pub thinking_budget: u32,
    pub request_timeout: Duration,
    pub video_poll_interval: Duration,
    pub video_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            document_model: DEFAULT_DOCUMENT_MODEL.to_string(),
            tip_model: DEFAULT_TIP_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            thinking_budget: DEFAULT_THINKING_BUDGET,
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            video_poll_interval: Duration::from_secs(DEFAULT_VIDEO_POLL_INTERVAL_SECS),
            video_timeout: Duration::from_secs(DEFAULT_VIDEO_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(env_vars::GEMINI_API_KEY).or_else(|| non_empty(env_vars::API_KEY));
        if api_key.is_none() {
            info!("GEMINI_API_KEY not set - generation calls will be rejected");
        }

        let number = |name: &str, default: u64| -> Result<u64, ConfigError> {
            match non_empty(name) {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                    var: name.to_string(),
                    value: raw,
                }),
                None => Ok(default),
            }
        };

        let thinking_budget = number(
            env_vars::BLUEPRINT_THINKING_BUDGET,
            u64::from(defaults.thinking_budget),
        )?;

        let config = Self {
            api_key,
            base_url: non_empty(env_vars::BLUEPRINT_API_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            document_model: non_empty(env_vars::BLUEPRINT_DOCUMENT_MODEL)
                .unwrap_or(defaults.document_model),
            tip_model: non_empty(env_vars::BLUEPRINT_TIP_MODEL).unwrap_or(defaults.tip_model),
            image_model: non_empty(env_vars::BLUEPRINT_IMAGE_MODEL).unwrap_or(defaults.image_model),
            video_model: non_empty(env_vars::BLUEPRINT_VIDEO_MODEL).unwrap_or(defaults.video_model),
            thinking_budget: u32::try_from(thinking_budget).map_err(|_| {
                ConfigError::InvalidNumber {
                    var: env_vars::BLUEPRINT_THINKING_BUDGET.to_string(),
                    value: thinking_budget.to_string(),
                }
            })?,
            request_timeout: Duration::from_secs(number(
                env_vars::BLUEPRINT_HTTP_TIMEOUT_SECS,
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            video_poll_interval: Duration::from_secs(number(
                env_vars::BLUEPRINT_VIDEO_POLL_INTERVAL_SECS,
                DEFAULT_VIDEO_POLL_INTERVAL_SECS,
            )?),
            video_timeout: Duration::from_secs(number(
                env_vars::BLUEPRINT_VIDEO_TIMEOUT_SECS,
                DEFAULT_VIDEO_TIMEOUT_SECS,
            )?),
        };

        if config.document_model != DEFAULT_DOCUMENT_MODEL {
            info!("Using custom document model: {}", config.document_model);
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.document_model, DEFAULT_DOCUMENT_MODEL);
        assert_eq!(config.video_poll_interval, Duration::from_secs(10));
        assert_eq!(config.thinking_budget, 32768);
    }

    #[test]
    fn test_legacy_key_and_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("API_KEY", "legacy"),
            ("BLUEPRINT_API_BASE_URL", "http://localhost:9999/"),
            ("BLUEPRINT_VIDEO_POLL_INTERVAL_SECS", "2"),
            ("BLUEPRINT_TIP_MODEL", "gemini-flash"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("legacy"));
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.video_poll_interval, Duration::from_secs(2));
        assert_eq!(config.tip_model, "gemini-flash");

        let config = GatewayConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "primary"),
            ("API_KEY", "legacy"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = GatewayConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        let err = GatewayConfig::from_lookup(lookup(&[("BLUEPRINT_VIDEO_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: "BLUEPRINT_VIDEO_TIMEOUT_SECS".to_string(),
                value: "soon".to_string()
            }
        );
    }
}
