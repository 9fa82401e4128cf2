//! Application configuration value object

use serde::{Deserialize, Serialize};

/// Default coach backend base URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Default capture fragment interval in milliseconds
pub const DEFAULT_FRAGMENT_MILLIS: u64 = 250;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_url: Option<String>,
    pub fragment_millis: Option<u64>,
    pub overlay: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            fragment_millis: Some(DEFAULT_FRAGMENT_MILLIS),
            overlay: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            server_url: other.server_url.or(self.server_url),
            fragment_millis: other.fragment_millis.or(self.fragment_millis),
            overlay: other.overlay.or(self.overlay),
        }
    }

    /// Get the server URL, or the default if not set
    pub fn server_url_or_default(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Get the fragment interval, or the default if not set
    pub fn fragment_millis_or_default(&self) -> u64 {
        self.fragment_millis.unwrap_or(DEFAULT_FRAGMENT_MILLIS)
    }

    /// Get the overlay setting, or false if not set
    pub fn overlay_or_default(&self) -> bool {
        self.overlay.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.server_url, Some(DEFAULT_SERVER_URL.to_string()));
        assert_eq!(config.fragment_millis, Some(DEFAULT_FRAGMENT_MILLIS));
        assert_eq!(config.overlay, Some(false));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.server_url.is_none());
        assert!(config.fragment_millis.is_none());
        assert!(config.overlay.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            server_url: Some("http://base:8000".to_string()),
            fragment_millis: Some(100),
            overlay: Some(false),
        };
        let other = AppConfig {
            server_url: Some("http://other:9000".to_string()),
            fragment_millis: None,
            overlay: Some(true),
        };

        let merged = base.merge(other);
        assert_eq!(merged.server_url, Some("http://other:9000".to_string()));
        assert_eq!(merged.fragment_millis, Some(100)); // Kept from base
        assert_eq!(merged.overlay, Some(true));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            server_url: Some("http://base:8000".to_string()),
            ..Default::default()
        };
        let merged = base.merge(AppConfig::empty());
        assert_eq!(merged.server_url, Some("http://base:8000".to_string()));
    }

    #[test]
    fn accessors_fall_back_to_defaults() {
        let config = AppConfig::empty();
        assert_eq!(config.server_url_or_default(), DEFAULT_SERVER_URL);
        assert_eq!(config.fragment_millis_or_default(), DEFAULT_FRAGMENT_MILLIS);
        assert!(!config.overlay_or_default());
    }
}
