//! # RisingHorn Mail Relay
//!
//! HTTP endpoint that turns form submissions into emails.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Relay API Server                              │
//! │                                                                         │
//! │  Browser / horn-submit ──► POST /api/contact ──► Inquiry ──► Mailer    │
//! │                                                    │            │       │
//! │                              400 {"error": ...} ◄──┘            ▼       │
//! │                                                            Resend API  │
//! │                              502 {"error": ...} ◄── send fails          │
//! │                              200 {"ok": true}   ◄── accepted            │
//! │                                                                         │
//! │  GET /api/health ──► 200 {"ok": true}                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

pub mod config;
pub mod error;
pub mod inquiry;
pub mod mailer;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::inquiry::{ContactForm, Inquiry};
use crate::mailer::Mailer;

/// Largest buffered request body. Leaves room for a maximal attachment
/// plus the text fields; anything larger is answered as an oversized
/// attachment.
pub const REQUEST_BODY_MAX: usize = 4 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub mailer: Arc<dyn Mailer>,
}

pub fn app(state: AppState) -> Router {
    let cors = state.config.allowed_origin.as_deref().and_then(|origin| {
        match HeaderValue::from_str(origin) {
            Ok(origin) => Some(
                CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([axum::http::header::CONTENT_TYPE]),
            ),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        }
    });

    let mut router = Router::new()
        .route("/api/contact", post(contact))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(REQUEST_BODY_MAX));

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn contact(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, RelayError> {
    let request_id = Uuid::new_v4();

    let body = body.map_err(|rejection| {
        warn!(%request_id, error = %rejection, "Unreadable contact body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::AttachmentTooLarge
        } else {
            RelayError::BadRequest
        }
    })?;

    let form: ContactForm = serde_json::from_slice(&body).map_err(|e| {
        warn!(%request_id, error = %e, "Unparseable contact body");
        RelayError::BadRequest
    })?;

    let inquiry = Inquiry::from_form(form).map_err(|e| {
        info!(%request_id, reason = %e, "Inquiry rejected");
        e
    })?;

    let email = inquiry.to_email(&state.config);
    info!(
        %request_id,
        inquiry_type = %inquiry.inquiry_type,
        to = %email.to.join(","),
        attachment = inquiry.attachment.is_some(),
        "Relaying inquiry"
    );

    if let Err(e) = state.mailer.send(&email).await {
        error!(%request_id, error = %e, "Email delivery failed");
        return Err(RelayError::SendFailed);
    }

    info!(%request_id, "Inquiry delivered");
    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mailboxes;
    use crate::mailer::{MailError, OutgoingEmail};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use horn_core::limits::ATTACHMENT_BASE64_MAX;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingMailer {
        fail: bool,
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                Err(MailError::Rejected {
                    status: 403,
                    body: "domain not verified".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn state(mailer: Arc<RecordingMailer>) -> AppState {
        AppState {
            config: Arc::new(RelayConfig {
                port: 3000,
                resend_api_key: "re_test".into(),
                resend_from: "RisingHorn Website <web@risinghorn.com>".into(),
                resend_api_url: "http://localhost/emails".into(),
                mailboxes: Mailboxes::default(),
                allowed_origin: Some("https://risinghorn.com".into()),
            }),
            mailer,
        }
    }

    async fn post_contact(mailer: Arc<RecordingMailer>, body: String) -> (StatusCode, Value) {
        let response = app(state(mailer))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_order_inquiry_is_relayed() {
        let mailer = Arc::new(RecordingMailer::default());
        let body = json!({
            "inquiryType": "orders",
            "name": "Amina",
            "phone": "+252611112222",
            "message": "ORDER REQUEST\nName: Amina",
            "attachmentName": "risinghorn-order-20260314-092653.pdf",
            "attachmentBase64": "JVBERg=="
        });

        let (status, json) = post_contact(mailer.clone(), body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "ok": true }));

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["orders@risinghorn.com".to_string()]);
        assert_eq!(sent[0].subject, "Order Inquiry — RisingHorn.com");
        assert_eq!(sent[0].reply_to, None);
        assert_eq!(sent[0].attachments[0].filename, "risinghorn-order-20260314-092653.pdf");
        assert_eq!(sent[0].attachments[0].content, b"%PDF");
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let cases = [
            (json!({ "message": "hey" }).to_string(), "Message is required."),
            (
                json!({ "message": "hello", "name": "n".repeat(121) }).to_string(),
                "Input too long.",
            ),
            (
                json!({ "message": "hello", "attachmentBase64": "###" }).to_string(),
                "Invalid attachment.",
            ),
            (
                json!({ "message": "hello", "attachmentBase64": "A".repeat(ATTACHMENT_BASE64_MAX + 4) })
                    .to_string(),
                "Attachment too large.",
            ),
            ("{not json".to_string(), "Bad request."),
            (json!({ "message": 42 }).to_string(), "Bad request."),
        ];

        for (body, expected) in cases {
            let mailer = Arc::new(RecordingMailer::default());
            let (status, json) = post_contact(mailer.clone(), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", expected);
            assert_eq!(json["error"], expected);
            assert!(mailer.sent.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_body_over_buffer_limit_is_attachment_too_large() {
        let mailer = Arc::new(RecordingMailer::default());
        let body = json!({
            "message": "hello there",
            "attachmentBase64": "A".repeat(REQUEST_BODY_MAX + 100_000)
        });

        let (status, json) = post_contact(mailer.clone(), body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Attachment too large.");
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mailer_failure_is_bad_gateway() {
        let mailer = Arc::new(RecordingMailer {
            fail: true,
            ..RecordingMailer::default()
        });
        let body = json!({ "message": "Do you ship to Bosaso?", "email": "buyer@shop.so" });

        let (status, json) = post_contact(mailer.clone(), body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "Failed to send email.");

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].to, vec!["info@risinghorn.com".to_string()]);
        assert_eq!(sent[0].reply_to.as_deref(), Some("buyer@shop.so"));
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(state(Arc::new(RecordingMailer::default())))
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = app(state(Arc::new(RecordingMailer::default())))
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/contact")
                    .header(header::ORIGIN, "https://risinghorn.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://risinghorn.com"
        );
    }
}
