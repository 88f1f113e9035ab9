use crate::retry::RetryPolicy;
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_ENV: &str = "HARVEST_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Everything the agent treats as a constant. Built once at startup and
/// passed down; every field can be overridden from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub submit_endpoint: String,
    pub earnings_endpoint: String,
    pub dashboard_origin: String,

    pub harvest_file: PathBuf,
    pub secrets_file: PathBuf,
    pub tokens_file: PathBuf,
    pub proxy_file: PathBuf,

    pub cycle_delay_secs: u64,
    pub account_delay_secs: u64,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            submit_endpoint: "https://m8k9mykqqj.us-east-1.awsapprunner.com/api/harvest-data"
                .to_string(),
            earnings_endpoint: "https://api.dashboard.3dos.io/api/profile/me".to_string(),
            dashboard_origin: "https://dashboard.3dos.io".to_string(),
            harvest_file: PathBuf::from("harvest.json"),
            secrets_file: PathBuf::from("secret.txt"),
            tokens_file: PathBuf::from("token.txt"),
            proxy_file: PathBuf::from("proxy.txt"),
            cycle_delay_secs: 60,
            account_delay_secs: 5,
            request_timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 1000,
        }
    }
}

impl Settings {
    /// Reads `$HARVEST_CONFIG`, or `config.toml` when unset. A missing or
    /// empty file yields the defaults.
    pub fn new() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let config_data = fs::read_to_string(path).unwrap_or_default();
        Self::from_toml(&config_data)
    }

    pub fn from_toml(config_data: &str) -> Result<Self> {
        if config_data.trim().is_empty() {
            return Ok(Settings::default());
        }
        let settings: Settings = toml::from_str(config_data)?;
        Ok(settings)
    }

    pub fn cycle_delay(&self) -> Duration {
        Duration::from_secs(self.cycle_delay_secs)
    }

    pub fn account_delay(&self) -> Duration {
        Duration::from_secs(self.account_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}
