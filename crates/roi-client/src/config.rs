//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default service address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Settings for [`crate::HttpSimulatorApi`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root; API paths are appended to it
    pub base_url: String,
    /// Per-request timeout in milliseconds; `None` leaves it to the transport
    pub request_timeout_ms: Option<u64>,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl ClientConfig {
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
        self.base_url = base_url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Request timeout, if configured
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: None,
            user_agent: format!("roi-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods() {
        let config = ClientConfig::new()
            .with_base_url("http://roi.internal")
            .with_request_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, "http://roi.internal");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(ClientConfig::default().request_timeout(), None);
    }
}
