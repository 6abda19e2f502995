//! # Relay Payload
//!
//! The JSON body accepted by `POST /api/contact`.
//!
//! ```json
//! {
//!   "inquiryType": "orders",
//!   "name": "Amina",
//!   "phone": "+252611112222",
//!   "message": "ORDER REQUEST\n...",
//!   "attachmentName": "risinghorn-order-20260314-092653.pdf",
//!   "attachmentBase64": "JVBERi0xLjQK..."
//! }
//! ```
//!
//! Empty optional strings are sent as absent fields, never as `""`.
//! Attachment fields travel together or not at all.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::contact::{non_empty, ContactInfo};
use crate::document::Attachment;
use crate::order::OrderRequest;

/// Which mailbox an inquiry is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum InquiryType {
    #[default]
    General,
    Orders,
    Sales,
}

impl InquiryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryType::General => "general",
            InquiryType::Orders => "orders",
            InquiryType::Sales => "sales",
        }
    }
}

impl std::fmt::Display for InquiryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InquiryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(InquiryType::General),
            "orders" => Ok(InquiryType::Orders),
            "sales" => Ok(InquiryType::Sales),
            other => Err(format!("unknown inquiry type: {}", other)),
        }
    }
}

/// Body of one relay request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct RelayPayload {
    pub inquiry_type: InquiryType,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub email: Option<String>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub attachment_name: Option<String>,

    /// Base64 without a `data:` prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub attachment_base64: Option<String>,
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

impl RelayPayload {
    /// Payload for an arbitrary inquiry; contact fields are trimmed and
    /// empty ones dropped.
    pub fn new(inquiry_type: InquiryType, contact: &ContactInfo, message: impl Into<String>) -> Self {
        RelayPayload {
            inquiry_type,
            name: owned(contact.name()),
            company: owned(contact.company()),
            phone: owned(contact.phone()),
            email: owned(contact.email()),
            message: message.into(),
            attachment_name: None,
            attachment_base64: None,
        }
    }

    /// Payload for the order flow (`inquiryType` is always `orders`).
    pub fn for_order(order: &OrderRequest) -> Self {
        RelayPayload::new(InquiryType::Orders, order.contact(), order.message())
    }

    /// Attaches a rendered document.
    pub fn with_attachment(mut self, attachment: &Attachment) -> Self {
        self.attachment_name = Some(attachment.filename.clone());
        self.attachment_base64 = Some(attachment.to_base64());
        self
    }

    pub fn has_attachment(&self) -> bool {
        self.attachment_base64
            .as_deref()
            .and_then(non_empty)
            .is_some()
    }
}
