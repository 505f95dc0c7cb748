//! Configuration for connecting to Answers.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::util::safe_read_to_string;
use crate::error::{RowmapError, Result};

/// Default read timeout: 30 seconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;
/// Default connect timeout: 4 seconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 4_000;

/// Configuration for an `AnalyticsManagerFactory`
///
/// Loaded from JSON; every key is optional and falls back to `Default`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RowmapConfig {
    /// Base URL every service endpoint is rewritten to live under,
    /// e.g. `https://bi.example.org/analytics`
    pub endpoint_base_url: String,
    /// Answers user to log on as
    pub username: String,
    /// Password for `username`
    pub password: String,
    /// Socket read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Report executed by `AnalyticsManager::validate` to prove the BI server
    /// session is alive; skipped when unset
    pub validation_report_path: Option<String>,
}

impl Default for RowmapConfig {
    fn default() -> Self {
        Self {
            endpoint_base_url: String::new(),
            username: String::new(),
            password: String::new(),
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            validation_report_path: None,
        }
    }
}

impl fmt::Debug for RowmapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowmapConfig")
            .field("endpoint_base_url", &self.endpoint_base_url)
            .field("username", &self.username)
            .field("password", &"********")
            .field("read_timeout_ms", &self.read_timeout_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("validation_report_path", &self.validation_report_path)
            .finish()
    }
}

impl RowmapConfig {
    /// Parse a configuration from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = safe_read_to_string(path, "rowmap configuration")?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Loaded rowmap configuration from {}", path.display());
        Ok(config)
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Rewrite a service's built-in endpoint address so that it lives under
    /// `endpoint_base_url`, keeping everything after the host.
    ///
    /// Addresses that already start with the base URL are returned unchanged.
    pub fn endpoint_address(&self, default_address: &str) -> Result<String> {
        if default_address.starts_with(&self.endpoint_base_url) {
            return Ok(default_address.to_string());
        }

        let without_scheme = default_address
            .strip_prefix("https://")
            .or_else(|| default_address.strip_prefix("http://"))
            .ok_or_else(|| {
                RowmapError::configuration(format!(
                    "Can't find endpoint url suffix in {default_address}"
                ))
            })?;

        let suffix = match without_scheme.split_once('/') {
            Some((_host, suffix)) => suffix,
            None => {
                return Err(RowmapError::configuration(format!(
                    "Can't find endpoint url suffix in {default_address}"
                )));
            }
        };

        Ok(format!(
            "{}/{}",
            self.endpoint_base_url.trim_end_matches('/'),
            suffix
        ))
    }
}
