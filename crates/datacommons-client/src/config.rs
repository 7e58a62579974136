//! Configuration for the Data Commons client
//!
//! This module contains the configuration type and its loading from the
//! environment.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use datacommons_models::{DataCommonsError, DcResult};

/// Default number of requests the client keeps in flight at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 20;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout in seconds for each HTTP request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound on simultaneously outstanding requests, shared by every
    /// fan-out the client performs
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_base_url() -> String {
    "https://api.datacommons.org/v2".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration pointing at `base_url` with default limits
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> DcResult<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("DC_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(timeout) = env::var("DC_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                config.timeout_secs = timeout;
            } else {
                warn!("Invalid DC_TIMEOUT_SECS value: {}", timeout);
            }
        }

        if let Ok(max_concurrency) = env::var("DC_MAX_CONCURRENCY") {
            if let Ok(value) = max_concurrency.parse::<usize>() {
                config.max_concurrency = value;
            } else {
                warn!("Invalid DC_MAX_CONCURRENCY value: {}", max_concurrency);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the client cannot run with
    pub fn validate(&self) -> DcResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(DataCommonsError::ConfigError(
                "Base URL is required".to_string(),
            ));
        }

        if self.max_concurrency == 0 {
            return Err(DataCommonsError::ConfigError(
                "max_concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL of an API endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}
