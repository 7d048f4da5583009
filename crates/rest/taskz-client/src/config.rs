//! Client configuration.

use bon::Builder;
use std::time::Duration;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the backend URL.
pub const BASE_URL_ENV: &str = "TASKZ_API_URL";

#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// Base URL of the Taskz backend
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,

    /// Timeout applied to every request except login
    #[builder(default = Duration::from_secs(30))]
    pub request_timeout: Duration,

    /// Upper bound on the wait for a login response
    #[builder(default = Duration::from_secs(10))]
    pub login_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            login_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.login_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_matches_defaults() {
        let config = ClientConfig::builder()
            .base_url("https://tasks.example.com")
            .login_timeout(Duration::from_secs(3))
            .build();
        assert_eq!(config.base_url, "https://tasks.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.login_timeout, Duration::from_secs(3));
    }
}
