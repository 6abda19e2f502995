//! # Inquiry Session
//!
//! The contact page form: a free-text question routed to the info or
//! sales mailbox. Same status machine as the order form, no cart.
//!
//! ## Message Layout
//! ```text
//! Phone: +252611112222
//! Message: Do you ship to Bosaso?
//! ```

use chrono::{DateTime, Utc};
use horn_core::validation::{validate_email, validate_required};
use horn_core::{ContactInfo, InquiryType, RelayPayload};
use tracing::{debug, info, warn};

use crate::client::RelayClient;
use crate::error::SubmitResult;
use crate::session::PreparedSubmission;
use crate::status::{StatusMachine, SubmitFailure, SubmitStatus};

#[derive(Debug, Default)]
pub struct InquirySession {
    /// Name, company, phone and email. `notes` is unused here.
    pub contact: ContactInfo,
    pub message: String,
    inquiry_type: InquiryType,
    machine: StatusMachine,
}

impl InquirySession {
    pub fn new(inquiry_type: InquiryType) -> Self {
        InquirySession {
            inquiry_type,
            ..InquirySession::default()
        }
    }

    pub fn inquiry_type(&self) -> InquiryType {
        self.inquiry_type
    }

    pub fn set_inquiry_type(&mut self, inquiry_type: InquiryType) {
        self.inquiry_type = inquiry_type;
    }

    pub fn status(&self) -> &SubmitStatus {
        self.machine.status()
    }

    pub fn acknowledge(&mut self) {
        self.machine.acknowledge();
    }

    /// The text sent as `message`.
    pub fn compose(&self) -> String {
        format!(
            "Phone: {}\nMessage: {}",
            self.contact.phone().unwrap_or_default(),
            self.message.trim()
        )
    }

    fn check(&self) -> Result<(), SubmitFailure> {
        let result = validate_required("phone", &self.contact.phone)
            .and_then(|_| validate_required("message", &self.message))
            .and_then(|_| match self.contact.email() {
                Some(email) => validate_email(email),
                None => Ok(()),
            });

        result.map_err(|e| SubmitFailure::InvalidContact {
            field: e.field().to_string(),
            message: e.to_string(),
        })
    }

    /// See [`OrderSession::begin_submit`](crate::OrderSession::begin_submit).
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> SubmitResult<PreparedSubmission> {
        self.machine.ensure_idle()?;

        if let Err(failure) = self.check() {
            return Err(self.machine.refuse(failure));
        }

        self.machine.start();
        info!(inquiry_type = %self.inquiry_type, "Inquiry submission started");

        Ok(PreparedSubmission {
            payload: RelayPayload::new(self.inquiry_type, &self.contact, self.compose()),
            issued_at: now,
        })
    }

    /// On success every field is cleared; the inquiry type is kept.
    pub fn finish_submit(&mut self, outcome: SubmitResult<()>) -> &SubmitStatus {
        if let Err(e) = &outcome {
            warn!(error = %e, inquiry_type = %self.inquiry_type, "Inquiry submission failed");
        }

        if self.machine.finish(&outcome) {
            self.contact.clear();
            self.message.clear();
            info!(inquiry_type = %self.inquiry_type, "Inquiry sent");
        }

        self.machine.status()
    }

    pub async fn submit(&mut self, relay: &dyn RelayClient, now: DateTime<Utc>) -> &SubmitStatus {
        let prepared = match self.begin_submit(now) {
            Ok(prepared) => prepared,
            Err(e) => {
                debug!(error = %e, "Inquiry not sent");
                return self.machine.status();
            }
        };

        let outcome = relay.send(&prepared.payload).await;
        self.finish_submit(outcome)
    }
}
