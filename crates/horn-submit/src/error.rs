//! # Submission Error Types
//!
//! Error types for configuration and the relay round trip.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Submission Error Categories                         │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Relay               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Rejected (non-2xx)     │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  MalformedAck           │ │
//! │  │  ConfigLoad/Save│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Session: Busy (already sending), Refused (local guard failed) │   │
//! │  │           Core (unknown SKU on add)                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these texts reach the customer. The form shows
//! [`SubmitFailure::user_message`](crate::status::SubmitFailure::user_message).

use horn_core::CoreError;
use thiserror::Error;

use crate::status::SubmitFailure;

/// Result type alias for submission operations.
pub type SubmitResult<T> = Result<T, SubmitError>;

#[derive(Debug, Error)]
pub enum SubmitError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid relay URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Connection to relay failed: {0}")]
    ConnectionFailed(String),

    #[error("Relay did not answer within {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // Relay Errors
    // =========================================================================
    /// Non-2xx answer. `message` is the relay's `error` field when present.
    #[error("Relay rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// 2xx answer without `{"ok": true}`.
    #[error("Relay returned an unexpected acknowledgement: {0}")]
    MalformedAck(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// A submission is already in flight; state and cart were left untouched.
    #[error("A submission is already in progress")]
    Busy,

    /// A local guard failed; the session is now in `Error(failure)`.
    #[error("Submission refused: {0:?}")]
    Refused(SubmitFailure),

    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for SubmitError {
    fn from(err: url::ParseError) -> Self {
        SubmitError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for SubmitError {
    fn from(err: std::io::Error) -> Self {
        SubmitError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SubmitError {
    fn from(err: toml::de::Error) -> Self {
        SubmitError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SubmitError {
    fn from(err: toml::ser::Error) -> Self {
        SubmitError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SubmitError {
    /// Returns true if a manual resend could plausibly succeed.
    ///
    /// The client never retries on its own; this only drives logging.
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmitError::ConnectionFailed(_) | SubmitError::Timeout(_) => true,
            SubmitError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// True for failures of the relay round trip itself.
    pub fn is_relay_error(&self) -> bool {
        matches!(
            self,
            SubmitError::ConnectionFailed(_)
                | SubmitError::Timeout(_)
                | SubmitError::Rejected { .. }
                | SubmitError::MalformedAck(_)
        )
    }
}
