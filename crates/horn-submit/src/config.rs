//! # Client Configuration
//!
//! Where the relay lives and how orders are packaged.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     HORN_RELAY_URL=https://risinghorn.com/api/contact                  │
//! │     HORN_RELAY_TIMEOUT_SECS=20                                         │
//! │     HORN_ATTACH_PDF=false                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/risinghorn/submit.toml (Linux)                           │
//! │     ~/Library/Application Support/com.risinghorn.order/submit.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3000/api/contact, 15 s, PDF attached              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # submit.toml
//! [relay]
//! endpoint_url = "https://risinghorn.com/api/contact"
//! timeout_secs = 15
//!
//! [order]
//! attach_pdf = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SubmitError, SubmitResult};

// =============================================================================
// Relay Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Full URL of the contact endpoint.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Request timeout. The only bound on how long `Sending` can last.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_endpoint_url() -> String {
    "http://localhost:3000/api/contact".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for RelaySettings {
    fn default() -> Self {
        RelaySettings {
            endpoint_url: default_endpoint_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl RelaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parses and checks the endpoint (http or https only).
    pub fn endpoint(&self) -> SubmitResult<Url> {
        let url = Url::parse(&self.endpoint_url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SubmitError::InvalidUrl(format!(
                "Relay URL must use http:// or https://, got: {}",
                other
            ))),
        }
    }
}

// =============================================================================
// Order Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSettings {
    /// Attach a PDF rendering of the order to the relay payload.
    #[serde(default = "default_true")]
    pub attach_pdf: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OrderSettings {
    fn default() -> Self {
        OrderSettings { attach_pdf: true }
    }
}

// =============================================================================
// Client Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub relay: RelaySettings,

    #[serde(default)]
    pub order: OrderSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (submit.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SubmitResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> SubmitResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SubmitError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    pub fn validate(&self) -> SubmitResult<()> {
        self.relay.endpoint()?;

        if self.relay.timeout_secs == 0 {
            return Err(SubmitError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `HORN_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("HORN_RELAY_URL") {
            debug!(url = %url, "Overriding relay URL from environment");
            self.relay.endpoint_url = url;
        }

        if let Some(timeout) = lookup("HORN_RELAY_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.relay.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric relay timeout"),
            }
        }

        if let Some(flag) = lookup("HORN_ATTACH_PDF") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.order.attach_pdf = true,
                "0" | "false" | "no" | "off" => self.order.attach_pdf = false,
                _ => warn!(value = %flag, "Unknown HORN_ATTACH_PDF value"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "risinghorn", "order")
            .map(|dirs| dirs.config_dir().join("submit.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.relay.endpoint_url, "http://localhost:3000/api/contact");
        assert_eq!(config.relay.timeout(), Duration::from_secs(15));
        assert!(config.order.attach_pdf);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();
        config.relay.endpoint_url = "ftp://risinghorn.com/api/contact".into();
        assert!(matches!(config.validate(), Err(SubmitError::InvalidUrl(_))));

        config.relay.endpoint_url = "not a url".into();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.relay.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(SubmitError::InvalidConfig(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config.apply_overrides(lookup(&[
            ("HORN_RELAY_URL", "https://risinghorn.com/api/contact"),
            ("HORN_RELAY_TIMEOUT_SECS", "30"),
            ("HORN_ATTACH_PDF", "off"),
        ]));

        assert_eq!(config.relay.endpoint_url, "https://risinghorn.com/api/contact");
        assert_eq!(config.relay.timeout_secs, 30);
        assert!(!config.order.attach_pdf);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(lookup(&[
            ("HORN_RELAY_TIMEOUT_SECS", "soon"),
            ("HORN_ATTACH_PDF", "maybe"),
        ]));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_toml_serialization() {
        let config = ClientConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("[relay]"));
        assert!(text.contains("attach_pdf = true"));

        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [relay]
            endpoint_url = "https://risinghorn.com/api/contact"
            "#,
        )
        .unwrap();
        assert_eq!(config.relay.timeout_secs, 15);
        assert!(config.order.attach_pdf);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("horn-submit-config-{}", std::process::id()));
        let path = dir.join("submit.toml");

        let mut config = ClientConfig::default();
        config.relay.timeout_secs = 42;
        config.save(Some(path.clone())).unwrap();

        let loaded = ClientConfig::load(Some(path)).unwrap();
        // HORN_RELAY_TIMEOUT_SECS is not set in the test environment
        assert_eq!(loaded.relay.timeout_secs, 42);

        let _ = std::fs::remove_dir_all(dir);
    }
}
