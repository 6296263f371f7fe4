//! Job runner configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CRM_API_URL` - Operation endpoint (default: `http://127.0.0.1:8000/api`)
//! - `CRM_LOG_DIR` - Directory for the job log files (default: /tmp)
//! - `CRM_REPORT_MAX_ATTEMPTS` - Report attempts before giving up (default: 3)
//! - `CRM_REPORT_RETRY_DELAY_SECS` - Delay between report attempts (default: 60)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid CRM_API_URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Job runner configuration.
#[derive(Debug, Clone)]
pub struct JobsConfig {
    /// Full URL of the API operation endpoint
    pub api_url: Url,
    /// Directory the job log files are appended under
    pub log_dir: PathBuf,
    /// Report job: total attempts, counting the first
    pub report_max_attempts: u32,
    /// Report job: fixed delay between attempts
    pub report_retry_delay: Duration,
}

impl JobsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    /// Every variable has a default, so loading only fails on values
    /// that do not parse.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = Url::parse(&get_env_or_default("CRM_API_URL", "http://127.0.0.1:8000/api"))?;
        let log_dir = PathBuf::from(get_env_or_default("CRM_LOG_DIR", "/tmp"));
        let report_max_attempts = get_env_or_default("CRM_REPORT_MAX_ATTEMPTS", "3")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CRM_REPORT_MAX_ATTEMPTS".to_string(), e.to_string())
            })?;
        let retry_delay_secs = get_env_or_default("CRM_REPORT_RETRY_DELAY_SECS", "60")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CRM_REPORT_RETRY_DELAY_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_url,
            log_dir,
            report_max_attempts,
            report_retry_delay: Duration::from_secs(retry_delay_secs),
        })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
