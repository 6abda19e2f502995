//! # Submission Status
//!
//! The per-form state machine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            submit()                 relay ok                           │
//! │   Idle ───────────────► Sending ───────────────► Sent                  │
//! │    ▲  │                    │                      │                     │
//! │    │  │ local guard fails  │ relay fails          │                     │
//! │    │  ▼                    ▼                      │                     │
//! │    │  Error(reason) ◄──────┘                      │                     │
//! │    │       │                                      │                     │
//! │    └───────┴──────── acknowledge() ───────────────┘                     │
//! │                                                                         │
//! │  submit() while Sending is refused and changes nothing.                │
//! │  Error and Sent accept a new submit() directly.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::warn;
use ts_rs::TS;

use crate::error::{SubmitError, SubmitResult};

/// Why a submission did not go through, as shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum SubmitFailure {
    /// The cart has no lines.
    EmptyCart,

    /// Lines below their minimum order quantity, in cart order.
    MoqViolation { skus: Vec<String> },

    /// A required field is missing or malformed.
    InvalidContact { field: String, message: String },

    /// The rendered document exceeds what the relay accepts.
    AttachmentTooLarge { size: usize, max: usize },

    /// The document could not be rendered.
    AttachmentFailed { reason: String },

    /// Transport or relay failure. Details are logged, not shown.
    Relay,
}

impl SubmitFailure {
    /// Text for the form's status line.
    pub fn user_message(&self) -> String {
        match self {
            SubmitFailure::EmptyCart => {
                "Your cart is empty. Add at least one product before sending.".to_string()
            }
            SubmitFailure::MoqViolation { skus } => format!(
                "Some items are below the minimum order quantity: {}.",
                skus.join(", ")
            ),
            SubmitFailure::InvalidContact { message, .. } => format!("Please check the form: {}.", message),
            SubmitFailure::AttachmentTooLarge { .. } => {
                "The order document is too large to send. Please remove some items.".to_string()
            }
            SubmitFailure::AttachmentFailed { .. } => {
                "The order document could not be generated. Please try again.".to_string()
            }
            SubmitFailure::Relay => {
                "Sending failed. Please try again, or contact us on WhatsApp.".to_string()
            }
        }
    }

    /// Failures the customer fixes by editing the form, as opposed to resending.
    pub fn is_local(&self) -> bool {
        !matches!(self, SubmitFailure::Relay)
    }
}

/// Where a form is in its submission lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "state", content = "failure", rename_all = "camelCase")]
#[ts(export)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Sending,
    Sent,
    Error(SubmitFailure),
}

impl SubmitStatus {
    /// True while a request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmitStatus::Sending)
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, SubmitStatus::Sent)
    }

    pub fn failure(&self) -> Option<&SubmitFailure> {
        match self {
            SubmitStatus::Error(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitStatus::Idle => "idle",
            SubmitStatus::Sending => "sending",
            SubmitStatus::Sent => "sent",
            SubmitStatus::Error(_) => "error",
        }
    }
}

impl std::fmt::Display for SubmitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transitions
// =============================================================================

/// Transition rules shared by the order and inquiry sessions.
#[derive(Debug, Default)]
pub(crate) struct StatusMachine {
    status: SubmitStatus,
}

impl StatusMachine {
    pub(crate) fn status(&self) -> &SubmitStatus {
        &self.status
    }

    /// Refuses while `Sending`; otherwise leaves the state alone so the
    /// caller can run its local guards first.
    pub(crate) fn ensure_idle(&self) -> SubmitResult<()> {
        if self.status.is_busy() {
            return Err(SubmitError::Busy);
        }
        Ok(())
    }

    /// Local guard failed: `Error(failure)`, no network call.
    pub(crate) fn refuse(&mut self, failure: SubmitFailure) -> SubmitError {
        self.status = SubmitStatus::Error(failure.clone());
        SubmitError::Refused(failure)
    }

    pub(crate) fn start(&mut self) {
        self.status = SubmitStatus::Sending;
    }

    /// Applies the relay outcome. Returns true when the caller should clear
    /// its form (the transition was `Sending → Sent`).
    pub(crate) fn finish(&mut self, outcome: &SubmitResult<()>) -> bool {
        if !self.status.is_busy() {
            warn!(status = %self.status, "Relay outcome arrived with no submission in flight");
            return false;
        }

        match outcome {
            Ok(()) => {
                self.status = SubmitStatus::Sent;
                true
            }
            Err(_) => {
                self.status = SubmitStatus::Error(SubmitFailure::Relay);
                false
            }
        }
    }

    /// `Sent | Error → Idle`. Ignored while sending.
    pub(crate) fn acknowledge(&mut self) {
        if !self.status.is_busy() {
            self.status = SubmitStatus::Idle;
        }
    }
}
