//! Advisor configuration parsed from environment variables.

use super::types::AdvisorError;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisorTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeouts: AdvisorTimeouts,
}

impl AdvisorConfig {
    /// Build typed advisor config from environment variables.
    ///
    /// Required:
    /// - `ADVISOR_BASE_URL`
    ///
    /// Optional:
    /// - `ADVISOR_API_KEY`: bearer token sent with every request
    /// - `ADVISOR_REQUEST_TIMEOUT_SECS`: default 60
    /// - `ADVISOR_CONNECT_TIMEOUT_SECS`: default 10
    pub fn from_env() -> Result<Self, AdvisorError> {
        let base_url = std::env::var("ADVISOR_BASE_URL")
            .map_err(|_| AdvisorError::MissingBaseUrl { var: "ADVISOR_BASE_URL".into() })?
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            return Err(AdvisorError::ConfigParse("ADVISOR_BASE_URL is empty".into()));
        }

        let api_key = std::env::var("ADVISOR_API_KEY").ok().filter(|k| !k.is_empty());
        let timeouts = AdvisorTimeouts {
            request_secs: env_parse_u64("ADVISOR_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("ADVISOR_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, api_key, timeouts })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
