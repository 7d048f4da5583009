//! Configuration for the `taskz` command.
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - a TOML file (`taskz.toml`, or the path in `TASKZ_CONFIG_FILE`)
//! - `TASKZ__*` environment variables, e.g. `TASKZ__API__REQUEST_TIMEOUT_SECS`
//! - `TASKZ_API_URL` for the backend URL

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use taskz_client::{BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL};
use tracing::{debug, info};

pub const CONFIG_FILE_ENV: &str = "TASKZ_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "taskz.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL
    pub base_url: String,

    /// Timeout for every request except login, in seconds
    pub request_timeout_secs: u64,

    /// Timeout for login, in seconds
    pub login_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session file; defaults to `<config dir>/taskz/session.json`
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            login_timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment and the optional config file
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let config_path = Path::new(&config_path);

        let mut builder = ConfigBuilder::builder();
        if config_path.exists() {
            info!("Loading configuration from {}", config_path.display());
            builder = builder.add_source(File::from(config_path));
        } else {
            debug!("No config file at {}, using defaults", config_path.display());
        }

        builder = builder.add_source(
            Environment::with_prefix("TASKZ")
                .separator("__")
                .try_parsing(true),
        );

        let mut settings: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            settings.override_base_url(Some(url));
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a single TOML file over the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings: AppConfig = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Replace the base URL when `url` is non-blank.
    pub fn override_base_url(&mut self, url: Option<String>) {
        if let Some(url) = url.map(|url| url.trim().to_string()).filter(|url| !url.is_empty()) {
            debug!("Using backend URL override {}", url);
            self.api.base_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("Backend URL cannot be empty");
        }
        if self.api.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be greater than 0");
        }
        if self.api.login_timeout_secs == 0 {
            anyhow::bail!("Login timeout must be greater than 0");
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::builder()
            .base_url(self.api.base_url.trim())
            .request_timeout(Duration::from_secs(self.api.request_timeout_secs))
            .login_timeout(Duration::from_secs(self.api.login_timeout_secs))
            .build()
    }

    /// Where the session is persisted.
    pub fn session_path(&self) -> Result<PathBuf> {
        match &self.session.path {
            Some(path) => Ok(path.clone()),
            None => {
                let dir = dirs::config_dir().context("Failed to get config directory")?;
                Ok(dir.join("taskz").join("session.json"))
            }
        }
    }
}
