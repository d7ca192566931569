//! Connection settings for the mind service.
//!
//! Loaded from the `mind` section of `nature-config.yaml`. The `AGENTS_URL`
//! environment variable overrides the configured URL.

use std::time::Duration;

use serde::Deserialize;

/// Environment variable that overrides [`MindConfig::url`].
pub const AGENTS_URL_ENV: &str = "AGENTS_URL";

/// Mind service connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MindConfig {
    /// Base URL of the mind service (e.g. `http://localhost:8080/`).
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in milliseconds. Absent means no timeout.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl Default for MindConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_ms: None,
        }
    }
}

impl MindConfig {
    /// Apply environment variable overrides.
    ///
    /// - `AGENTS_URL` overrides `url`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(AGENTS_URL_ENV) {
            self.url = url;
        }
    }

    /// The base URL with exactly one trailing slash, ready for endpoint
    /// paths to be appended.
    pub fn base_url(&self) -> String {
        format!("{}/", self.url.trim_end_matches('/'))
    }

    /// The configured request timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn default_url() -> String {
    String::from("http://localhost:8080/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_normalises_trailing_slash() {
        let bare = MindConfig {
            url: String::from("http://mind:5000"),
            request_timeout_ms: None,
        };
        assert_eq!(bare.base_url(), "http://mind:5000/");

        let doubled = MindConfig {
            url: String::from("http://mind:5000//"),
            request_timeout_ms: None,
        };
        assert_eq!(doubled.base_url(), "http://mind:5000/");
    }

    #[test]
    fn timeout_is_optional() {
        let config = MindConfig::default();
        assert_eq!(config.request_timeout(), None);

        let with_timeout = MindConfig {
            request_timeout_ms: Some(1500),
            ..MindConfig::default()
        };
        assert_eq!(with_timeout.request_timeout(), Some(Duration::from_millis(1500)));
    }
}
