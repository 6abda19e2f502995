//! # Relay Client
//!
//! One JSON POST per submission.
//!
//! ```text
//! ┌──────────────┐   POST endpoint_url          ┌──────────────┐
//! │ Session      │   application/json           │ relay-api    │
//! │              │ ───────────────────────────► │              │
//! │ RelayPayload │                              │ /api/contact │
//! │              │ ◄─────────────────────────── │              │
//! └──────────────┘   2xx {"ok": true}  → Ok     └──────────────┘
//!                    anything else     → Err
//! ```
//!
//! There is no retry loop here; a failed send surfaces as
//! `SubmitStatus::Error(Relay)` and the customer decides whether to resend.

use async_trait::async_trait;
use horn_core::RelayPayload;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::RelaySettings;
use crate::error::{SubmitError, SubmitResult};

/// Sends one payload to the mail relay.
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn send(&self, payload: &RelayPayload) -> SubmitResult<()>;
}

/// The relay's JSON answer: `{"ok": true}` or `{"error": "..."}`.
#[derive(Debug, Default, Deserialize)]
struct RelayAck {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// [`RelayClient`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout_secs: u64,
}

impl HttpRelayClient {
    pub fn new(settings: &RelaySettings) -> SubmitResult<Self> {
        let endpoint = settings.endpoint()?;
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| SubmitError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(HttpRelayClient {
            http,
            endpoint,
            timeout_secs: settings.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn transport_error(&self, err: reqwest::Error) -> SubmitError {
        if err.is_timeout() {
            SubmitError::Timeout(self.timeout_secs)
        } else {
            SubmitError::ConnectionFailed(err.to_string())
        }
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn send(&self, payload: &RelayPayload) -> SubmitResult<()> {
        debug!(
            endpoint = %self.endpoint,
            inquiry_type = %payload.inquiry_type,
            attachment = payload.has_attachment(),
            "Posting to relay"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let ack: RelayAck = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() {
            let message = ack.error.unwrap_or_else(|| body.clone());
            warn!(status = status.as_u16(), error = %message, "Relay rejected submission");
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        if !ack.ok {
            return Err(SubmitError::MalformedAck(body));
        }

        Ok(())
    }
}
