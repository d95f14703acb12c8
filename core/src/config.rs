//! Client configuration.
//!
//! `ClientConfig` deserializes from any serde source with per-field
//! defaults, or loads from `SAM_*` environment variables.

use std::time::Duration;

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

pub const ENV_BASE_URL: &str = "SAM_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "SAM_TIMEOUT_SECS";
pub const ENV_ACCESS_TOKEN: &str = "SAM_ACCESS_TOKEN";
pub const ENV_USER_AGENT: &str = "SAM_USER_AGENT";

/// Connection settings for `ResourcesApi`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and optional path prefix; operation paths are appended.
    pub base_url: String,
    /// Upper bound for one request, connect through body read. Never zero.
    #[serde(deserialize_with = "positive_secs")]
    pub timeout_secs: u64,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub access_token: Option<String>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
            access_token: None,
            user_agent: concat!("sam-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// The request timeout; a zero `timeout_secs` set by hand counts as one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Load from `SAM_BASE_URL`, `SAM_TIMEOUT_SECS`, `SAM_ACCESS_TOKEN` and
    /// `SAM_USER_AGENT`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
        }
        config.access_token = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.is_empty());
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }
        Ok(config)
    }
}

fn positive_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    if secs == 0 {
        return Err(de::Error::invalid_value(
            Unexpected::Unsigned(0),
            &"a timeout of at least one second",
        ));
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn unset_environment_yields_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.user_agent.starts_with("sam-client/"));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://sam.example.org"),
            (ENV_TIMEOUT_SECS, " 30 "),
            (ENV_ACCESS_TOKEN, "token-1"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://sam.example.org");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.access_token.as_deref(), Some("token-1"));
    }

    #[test]
    fn empty_token_is_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_ACCESS_TOKEN, "")])).unwrap();
        assert!(config.access_token.is_none());
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        for bad in ["soon", "0", "-5"] {
            let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { key: ENV_TIMEOUT_SECS, .. }), "{bad}");
        }
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://sam:8080","access_token":"t"}"#).unwrap();
        assert_eq!(config.base_url, "http://sam:8080");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.access_token.as_deref(), Some("t"));
    }

    #[test]
    fn deserialized_zero_timeout_is_rejected() {
        let err = serde_json::from_str::<ClientConfig>(r#"{"timeout_secs":0}"#).unwrap_err();
        assert!(err.to_string().contains("at least one second"), "{err}");

        let config: ClientConfig = serde_json::from_str(r#"{"timeout_secs":3}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn hand_set_zero_timeout_is_one_second() {
        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
