//! Error types for the relay endpoint.
//!
//! Every variant maps to a fixed status code and a fixed `{"error": ...}`
//! text. The texts are part of the public contract; the site shows them
//! verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Bad request.")]
    BadRequest,

    #[error("Message is required.")]
    MessageRequired,

    #[error("Input too long.")]
    InputTooLong,

    #[error("Attachment too large.")]
    AttachmentTooLarge,

    #[error("Invalid attachment.")]
    InvalidAttachment,

    /// The email provider refused or could not be reached.
    #[error("Failed to send email.")]
    SendFailed,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::SendFailed => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}
