//! # horn-submit: Submission Client for RisingHorn
//!
//! Holds the state of the order and contact forms and sends each completed
//! form to the mail relay exactly once.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Submission Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────┐     ┌──────────────────────────┐         │
//! │  │ OrderSession             │     │ InquirySession           │         │
//! │  │ cart + contact + status  │     │ contact + message        │         │
//! │  │ MOQ gate, PDF attachment │     │ general | sales          │         │
//! │  └────────────┬─────────────┘     └────────────┬─────────────┘         │
//! │               │  begin_submit → send → finish_submit                    │
//! │               └───────────────┬────────────────┘                        │
//! │                               ▼                                         │
//! │                ┌──────────────────────────────┐                         │
//! │                │ RelayClient (trait)          │                         │
//! │                │ HttpRelayClient: 1 POST,     │                         │
//! │                │ 2xx + {"ok": true} = success │                         │
//! │                └──────────────────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`client`] - `RelayClient` trait and its HTTP implementation
//! - [`config`] - Relay endpoint, timeout, attachment toggle
//! - [`error`] - Submission error types
//! - [`inquiry`] - Contact page session
//! - [`session`] - Order page session
//! - [`status`] - `Idle → Sending → Sent | Error` state machine
//!
//! ## Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use horn_core::Catalog;
//! use horn_submit::{ClientConfig, HttpRelayClient, OrderSession};
//!
//! # async fn example() -> horn_submit::SubmitResult<()> {
//! let config = ClientConfig::load(None)?;
//! let relay = HttpRelayClient::new(&config.relay)?;
//!
//! let mut session = OrderSession::from_config(Arc::new(Catalog::builtin()), &config);
//! session.add_item("RHG-SN-101", "10")?;
//! session.contact_mut().name = "Amina".into();
//! session.contact_mut().phone = "+252611112222".into();
//!
//! let status = session.submit(&relay, chrono::Utc::now()).await;
//! println!("{}", status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod inquiry;
pub mod session;
pub mod status;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{HttpRelayClient, RelayClient};
pub use config::{ClientConfig, OrderSettings, RelaySettings};
pub use error::{SubmitError, SubmitResult};
pub use inquiry::InquirySession;
pub use session::{OrderSession, PreparedSubmission};
pub use status::{SubmitFailure, SubmitStatus};
