//! Simulator configuration
//!
//! Plain serde struct with defaults, loadable from TOML:
//!
//! ```toml
//! debounce_ms = 300
//! download_dir = "reports"
//!
//! [client]
//! base_url = "http://127.0.0.1:5000"
//! request_timeout_ms = 10000
//! ```

use crate::error::ConfigError;
use roi_client::ClientConfig;
use roi_core::DEFAULT_REPORT_FILENAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Debounce window applied to simulation requests
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Service client settings
    pub client: ClientConfig,
    /// Quiet period before a simulation request is sent
    pub debounce_ms: u64,
    /// Where downloaded reports are written
    pub download_dir: PathBuf,
    /// Report filename when the service sends none
    pub default_report_filename: String,
}

impl SimulatorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    /// With debounce window
    #[inline]
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With download directory
    #[inline]
    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parse and validate TOML
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject values the controller cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("client.base_url must not be empty".into()));
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid("debounce_ms must be greater than zero".into()));
        }
        if self.default_report_filename.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_report_filename must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            download_dir: PathBuf::from("."),
            default_report_filename: DEFAULT_REPORT_FILENAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.default_report_filename, "roi_report.pdf");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let config = SimulatorConfig::from_toml_str(
            r#"
            download_dir = "reports"

            [client]
            base_url = "http://roi.internal:8080"
            request_timeout_ms = 2500
            "#,
        )
        .unwrap();

        assert_eq!(config.client.base_url, "http://roi.internal:8080");
        assert_eq!(config.client.request_timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.download_dir, PathBuf::from("reports"));
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn rejects_zero_debounce() {
        let err = SimulatorConfig::from_toml_str("debounce_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = SimulatorConfig::from_toml_str("debounce_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimulatorConfig::load("/definitely/not/here/roi.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
