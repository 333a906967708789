use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::services::poller::PollConfig;

/// Literal prefix every Replicate API token carries.
pub const TOKEN_PREFIX: &str = "r8_";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Replicate API token. Optional so the server can start degraded and
    /// answer 503 instead of refusing to boot.
    #[serde(default)]
    pub replicate_api_token: Option<String>,

    /// Base URL of the prediction API
    #[serde(default = "default_replicate_api_base")]
    pub replicate_api_base: String,

    /// Delay between two status polls of a pending prediction
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Polls allowed before a pending prediction counts as failed
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Timeout for each outbound HTTP call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Inbound body limit. Inline base64 images travel in the JSON body.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_replicate_api_base() -> String {
    "https://api.replicate.com/v1".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_poll_max_attempts() -> u32 {
    30
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_max_attempts,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn api_token(&self) -> Result<ApiToken, CredentialError> {
        ApiToken::parse(self.replicate_api_token.as_deref())
    }
}

/// A bearer token that passed the local format check.
///
/// The token is not verified against the remote service until first use.
#[derive(Clone)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn parse(raw: Option<&str>) -> Result<Self, CredentialError> {
        let token = raw.map(str::trim).unwrap_or_default();

        if token.is_empty() {
            return Err(CredentialError::Missing);
        }
        if !token.starts_with(TOKEN_PREFIX) {
            return Err(CredentialError::InvalidFormat);
        }

        Ok(Self(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("Missing API configuration")]
    Missing,

    #[error("Invalid token format")]
    InvalidFormat,
}
