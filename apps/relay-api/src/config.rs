//! Relay configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Missing provider credentials stop the process at startup.

use std::env;

use axum::http::HeaderValue;
use horn_core::contact::mailboxes;
use horn_core::InquiryType;

/// Default Resend endpoint.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Destination mailbox per inquiry type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailboxes {
    pub info: String,
    pub orders: String,
    pub sales: String,
}

impl Default for Mailboxes {
    fn default() -> Self {
        Mailboxes {
            info: mailboxes::INFO.to_string(),
            orders: mailboxes::ORDERS.to_string(),
            sales: mailboxes::SALES.to_string(),
        }
    }
}

impl Mailboxes {
    /// orders → orders, sales → sales, everything else → info.
    pub fn recipient(&self, inquiry_type: InquiryType) -> &str {
        match inquiry_type {
            InquiryType::Orders => &self.orders,
            InquiryType::Sales => &self.sales,
            InquiryType::General => &self.info,
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// HTTP listen port
    pub port: u16,

    /// Email provider API key
    pub resend_api_key: String,

    /// Sender, e.g. `RisingHorn Website <web@risinghorn.com>`
    pub resend_from: String,

    /// Email provider endpoint
    pub resend_api_url: String,

    pub mailboxes: Mailboxes,

    /// Browser origin allowed to call the relay cross-site (optional)
    pub allowed_origin: Option<String>,
}

impl RelayConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingRequired(key.to_string()))
        };
        let defaulted = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let defaults = Mailboxes::default();

        let config = RelayConfig {
            port: defaulted("RELAY_PORT", "3000")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RELAY_PORT".to_string()))?,

            resend_api_key: required("RESEND_API_KEY")?,

            resend_from: required("RESEND_FROM")?,

            resend_api_url: defaulted("RESEND_API_URL", DEFAULT_RESEND_API_URL),

            mailboxes: Mailboxes {
                info: defaulted("CONTACT_EMAIL_INFO", &defaults.info),
                orders: defaulted("CONTACT_EMAIL_ORDERS", &defaults.orders),
                sales: defaulted("CONTACT_EMAIL_SALES", &defaults.sales),
            },

            allowed_origin: lookup("RELAY_ALLOWED_ORIGIN")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        };

        if let Some(origin) = &config.allowed_origin {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::InvalidValue("RELAY_ALLOWED_ORIGIN".to_string()));
            }
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
