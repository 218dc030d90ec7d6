//! Configuration module
//!
//! Handles CLI configuration: API location, state file and polling limits.

use anyhow::{Context, Result};
use jobscout_client::{ApiClient, Endpoints, PollConfig};
use std::path::PathBuf;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the API (e.g., "https://api.example.com/prod")
    pub api_url: String,

    /// JSON file holding the client state
    pub state_file: PathBuf,

    /// Delay between task status checks
    pub poll_interval: Duration,

    /// Status checks before giving up on a task
    pub max_attempts: u32,

    /// Timeout of one HTTP request
    pub request_timeout: Duration,

    /// Route table
    pub endpoints: Endpoints,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            anyhow::bail!("api url cannot be empty");
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("api url must start with http:// or https://");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request timeout must be greater than 0");
        }

        self.poll_config().validate()?;

        Ok(())
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new(self.poll_interval, self.max_attempts)
    }

    /// Builds the API client
    pub fn client(&self) -> Result<ApiClient> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ApiClient::with_client(self.api_url.trim(), http).with_endpoints(self.endpoints.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            api_url: "http://localhost:3000".to_string(),
            state_file: PathBuf::from(".jobscout/state.json"),
            poll_interval: Duration::from_millis(3000),
            max_attempts: 200,
            request_timeout: Duration::from_secs(30),
            endpoints: Endpoints::default(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_url() {
        for url in ["", "   ", "localhost:3000", "ftp://example.com"] {
            let config = Config {
                api_url: url.to_string(),
                ..config()
            };
            assert!(config.validate().is_err(), "{}", url);
        }
    }

    #[test]
    fn test_rejects_zero_polling_limits() {
        let zero_interval = Config {
            poll_interval: Duration::ZERO,
            ..config()
        };
        assert!(zero_interval.validate().is_err());

        let zero_attempts = Config {
            max_attempts: 0,
            ..config()
        };
        assert!(zero_attempts.validate().is_err());
    }

    #[test]
    fn test_client_uses_configured_routes() {
        let config = Config {
            api_url: "https://api.example.com/prod/".to_string(),
            endpoints: Endpoints {
                tasks: "/status".to_string(),
                ..Default::default()
            },
            ..config()
        };

        let client = config.client().unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/prod");
        assert_eq!(
            client.task_url("t1").unwrap().as_str(),
            "https://api.example.com/prod/status/t1"
        );
    }
}
