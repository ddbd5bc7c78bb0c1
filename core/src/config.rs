//! Client configuration.
//!
//! Defaults match a prediction server started locally on port 5000.
//! Deployments override them through the environment:
//!
//! | Variable                 | Default                 |
//! |--------------------------|-------------------------|
//! | `LEAFSCAN_API_URL`       | `http://127.0.0.1:5000` |
//! | `LEAFSCAN_TIMEOUT_SECS`  | `30`                    |
//! | `LEAFSCAN_MAX_UPLOAD_MB` | `200`                   |

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Prediction server base URL used when nothing is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Path of the prediction endpoint, relative to the base URL.
pub const PREDICT_PATH: &str = "/predict";

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "image";

/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum upload size in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;

/// Environment variable names.
pub const ENV_API_URL: &str = "LEAFSCAN_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "LEAFSCAN_TIMEOUT_SECS";
pub const ENV_MAX_UPLOAD_MB: &str = "LEAFSCAN_MAX_UPLOAD_MB";

/// Settings shared by the intake, the prediction client and its transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    request_timeout: Duration,
    max_upload_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at `base_url`, other settings default.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::default().with_base_url(base_url)
    }

    /// Build from `LEAFSCAN_*` environment variables.
    ///
    /// Unset variables fall back to defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, build-time constants, tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config = config.with_base_url(&url)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config = config.with_timeout(parse_timeout(&raw)?);
        }
        if let Some(raw) = lookup(ENV_MAX_UPLOAD_MB) {
            let mb = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|mb| *mb > 0)
                .ok_or_else(|| ConfigError::InvalidLimit(raw.clone()))?;
            let bytes = mb
                .checked_mul(1024 * 1024)
                .ok_or_else(|| ConfigError::InvalidLimit(raw.clone()))?;
            config = config.with_max_upload_bytes(bytes);
        }

        Ok(config)
    }

    /// Set the base URL. Must be http(s); a trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let has_host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_host {
            return Err(ConfigError::InvalidUrl(base_url.to_string()));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the upload limit in bytes.
    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Full URL of the prediction endpoint.
    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, PREDICT_PATH)
    }
}

/// Parse a timeout given in (possibly fractional) seconds.
pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .ok_or_else(|| ConfigError::InvalidTimeout(raw.to_string()))
}
