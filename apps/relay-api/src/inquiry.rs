//! Validation and email composition for `POST /api/contact`.
//!
//! ## Checks (in order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  body is not a JSON object of strings   → 400 "Bad request."            │
//! │  message < 5 characters (trimmed)       → 400 "Message is required."    │
//! │  name > 120, company > 200, email > 200,                                │
//! │  phone > 60, message > 8000             → 400 "Input too long."         │
//! │  attachmentBase64 > 3,000,000 chars     → 400 "Attachment too large."   │
//! │  attachmentBase64 does not decode       → 400 "Invalid attachment."     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};
use horn_core::limits::{
    ATTACHMENT_BASE64_MAX, COMPANY_MAX, EMAIL_MAX, MESSAGE_MAX, MESSAGE_MIN, NAME_MAX, PHONE_MAX,
};
use horn_core::validation::{validate_max_len, validate_min_len};
use horn_core::{InquiryType, NOT_PROVIDED};
use serde::Deserialize;
use tracing::debug;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::mailer::{MailAttachment, OutgoingEmail};

pub const DEFAULT_ATTACHMENT_NAME: &str = "attachment.pdf";
pub const ATTACHMENT_CONTENT_TYPE: &str = "application/pdf";
pub const SUBJECT_SUFFIX: &str = " — RisingHorn.com";

/// The request body as received. Every field is optional; an unknown
/// `inquiryType` is routed as `general`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub inquiry_type: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub attachment_name: Option<String>,
    pub attachment_base64: Option<String>,
}

/// A validated inquiry. Strings are trimmed; empty means not provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inquiry {
    pub inquiry_type: InquiryType,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    pub attachment: Option<MailAttachment>,
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl Inquiry {
    pub fn from_form(form: ContactForm) -> Result<Self, RelayError> {
        let inquiry_type = form
            .inquiry_type
            .as_deref()
            .and_then(|t| t.parse::<InquiryType>().ok())
            .unwrap_or_default();

        let name = trimmed(form.name);
        let company = trimmed(form.company);
        let phone = trimmed(form.phone);
        let email = trimmed(form.email);
        let message = trimmed(form.message);

        validate_min_len("message", &message, MESSAGE_MIN).map_err(|_| RelayError::MessageRequired)?;

        [
            ("name", &name, NAME_MAX),
            ("company", &company, COMPANY_MAX),
            ("email", &email, EMAIL_MAX),
            ("phone", &phone, PHONE_MAX),
            ("message", &message, MESSAGE_MAX),
        ]
        .into_iter()
        .try_for_each(|(field, value, max)| validate_max_len(field, value, max))
        .map_err(|e| {
            debug!(field = %e.field(), "Inquiry field over limit");
            RelayError::InputTooLong
        })?;

        let attachment = decode_attachment(
            &trimmed(form.attachment_name),
            &trimmed(form.attachment_base64),
        )?;

        Ok(Inquiry {
            inquiry_type,
            name,
            company,
            phone,
            email,
            message,
            attachment,
        })
    }

    /// `Order Inquiry`, `Supplier/Partnership Inquiry` or `Website Contact`.
    pub fn subject_prefix(&self) -> &'static str {
        match self.inquiry_type {
            InquiryType::Orders => "Order Inquiry",
            InquiryType::Sales => "Supplier/Partnership Inquiry",
            InquiryType::General => "Website Contact",
        }
    }

    pub fn subject(&self) -> String {
        format!("{}{}", self.subject_prefix(), SUBJECT_SUFFIX)
    }

    pub fn html(&self) -> String {
        let field = |value: &str| escape_html(if value.is_empty() { NOT_PROVIDED } else { value });

        format!(
            concat!(
                "<div style=\"font-family:ui-sans-serif,system-ui,Segoe UI,Roboto,Helvetica,Arial;line-height:1.4\">\n",
                "  <h2>{prefix}</h2>\n",
                "  <p><strong>Name:</strong> {name}</p>\n",
                "  <p><strong>Company:</strong> {company}</p>\n",
                "  <p><strong>Email:</strong> {email}</p>\n",
                "  <p><strong>Phone:</strong> {phone}</p>\n",
                "  <p><strong>Inquiry Type:</strong> {inquiry_type}</p>\n",
                "  <hr/>\n",
                "  <pre style=\"white-space:pre-wrap\">{message}</pre>\n",
                "</div>\n",
            ),
            prefix = self.subject_prefix(),
            name = field(&self.name),
            company = field(&self.company),
            email = field(&self.email),
            phone = field(&self.phone),
            inquiry_type = escape_html(self.inquiry_type.as_str()),
            message = escape_html(&self.message),
        )
    }

    /// The email for this inquiry under `config`.
    pub fn to_email(&self, config: &RelayConfig) -> OutgoingEmail {
        OutgoingEmail {
            from: config.resend_from.clone(),
            to: vec![config.mailboxes.recipient(self.inquiry_type).to_string()],
            subject: self.subject(),
            reply_to: (!self.email.is_empty()).then(|| self.email.clone()),
            html: self.html(),
            attachments: self.attachment.iter().cloned().collect(),
        }
    }
}

fn decode_attachment(name: &str, encoded: &str) -> Result<Option<MailAttachment>, RelayError> {
    if encoded.is_empty() {
        return Ok(None);
    }

    if encoded.len() > ATTACHMENT_BASE64_MAX {
        return Err(RelayError::AttachmentTooLarge);
    }

    let content = STANDARD
        .decode(encoded)
        .map_err(|_| RelayError::InvalidAttachment)?;

    Ok(Some(MailAttachment {
        filename: if name.is_empty() {
            DEFAULT_ATTACHMENT_NAME.to_string()
        } else {
            name.to_string()
        },
        content_type: ATTACHMENT_CONTENT_TYPE.to_string(),
        content,
    }))
}

/// Escapes `& < > " '` for HTML text and attribute contexts.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mailboxes;

    fn form(message: &str) -> ContactForm {
        ContactForm {
            message: Some(message.to_string()),
            ..ContactForm::default()
        }
    }

    fn config() -> RelayConfig {
        RelayConfig {
            port: 3000,
            resend_api_key: "re_test".into(),
            resend_from: "RisingHorn Website <web@risinghorn.com>".into(),
            resend_api_url: "http://localhost/emails".into(),
            mailboxes: Mailboxes::default(),
            allowed_origin: None,
        }
    }

    #[test]
    fn test_message_required() {
        assert!(matches!(
            Inquiry::from_form(form("  hey  ")),
            Err(RelayError::MessageRequired)
        ));
        assert!(matches!(
            Inquiry::from_form(ContactForm::default()),
            Err(RelayError::MessageRequired)
        ));
        assert!(Inquiry::from_form(form("hello")).is_ok());
    }

    #[test]
    fn test_length_limits() {
        let mut f = form("hello there");
        f.name = Some("n".repeat(121));
        assert!(matches!(Inquiry::from_form(f), Err(RelayError::InputTooLong)));

        let mut f = form("hello there");
        f.company = Some("c".repeat(200));
        assert!(Inquiry::from_form(f).is_ok());

        let mut f = form("hello there");
        f.phone = Some("1".repeat(61));
        assert!(matches!(Inquiry::from_form(f), Err(RelayError::InputTooLong)));

        assert!(matches!(
            Inquiry::from_form(form(&"m".repeat(8001))),
            Err(RelayError::InputTooLong)
        ));
    }

    #[test]
    fn test_unknown_inquiry_type_is_general() {
        let mut f = form("hello there");
        f.inquiry_type = Some("partnership".into());
        assert_eq!(Inquiry::from_form(f).unwrap().inquiry_type, InquiryType::General);

        let mut f = form("hello there");
        f.inquiry_type = Some("orders".into());
        assert_eq!(Inquiry::from_form(f).unwrap().inquiry_type, InquiryType::Orders);
    }

    #[test]
    fn test_attachment_rules() {
        let mut f = form("hello there");
        f.attachment_base64 = Some("JVBERg==".into());
        let inquiry = Inquiry::from_form(f).unwrap();
        let attachment = inquiry.attachment.unwrap();
        assert_eq!(attachment.filename, DEFAULT_ATTACHMENT_NAME);
        assert_eq!(attachment.content, b"%PDF");

        let mut f = form("hello there");
        f.attachment_base64 = Some("not base64!!".into());
        assert!(matches!(Inquiry::from_form(f), Err(RelayError::InvalidAttachment)));

        let mut f = form("hello there");
        f.attachment_base64 = Some("A".repeat(ATTACHMENT_BASE64_MAX + 4));
        assert!(matches!(Inquiry::from_form(f), Err(RelayError::AttachmentTooLarge)));

        // A name without content is ignored
        let mut f = form("hello there");
        f.attachment_name = Some("order.pdf".into());
        assert!(Inquiry::from_form(f).unwrap().attachment.is_none());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_email_composition() {
        let mut f = form("ORDER REQUEST\n<script>");
        f.inquiry_type = Some("orders".into());
        f.name = Some(" Amina ".into());
        f.email = Some("buyer@shop.so".into());
        let email = Inquiry::from_form(f).unwrap().to_email(&config());

        assert_eq!(email.to, vec!["orders@risinghorn.com".to_string()]);
        assert_eq!(email.subject, "Order Inquiry — RisingHorn.com");
        assert_eq!(email.reply_to.as_deref(), Some("buyer@shop.so"));
        assert!(email.html.contains("<p><strong>Name:</strong> Amina</p>"));
        assert!(email.html.contains("<p><strong>Company:</strong> (not provided)</p>"));
        assert!(email.html.contains("<p><strong>Inquiry Type:</strong> orders</p>"));
        assert!(email.html.contains("ORDER REQUEST\n&lt;script&gt;</pre>"));
        assert!(email.attachments.is_empty());
    }

    #[test]
    fn test_general_without_email() {
        let email = Inquiry::from_form(form("Do you ship to Bosaso?"))
            .unwrap()
            .to_email(&config());
        assert_eq!(email.to, vec!["info@risinghorn.com".to_string()]);
        assert_eq!(email.subject, "Website Contact — RisingHorn.com");
        assert_eq!(email.reply_to, None);
    }
}
