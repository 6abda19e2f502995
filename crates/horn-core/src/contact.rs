//! # Contact
//!
//! Customer contact fields as typed into the form, plus the company's own
//! contact directory.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{validate_email, validate_required, ValidationResult};

// =============================================================================
// Contact Directory
// =============================================================================

/// Company mailboxes, one per inquiry type.
pub mod mailboxes {
    pub const INFO: &str = "info@risinghorn.com";
    pub const ORDERS: &str = "orders@risinghorn.com";
    pub const SALES: &str = "sales@risinghorn.com";
}

/// A WhatsApp-enabled company number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatsAppNumber {
    /// Display form, e.g. "+252 61 234 5678".
    pub label: &'static str,
    /// Digits only, for wa.me links.
    pub e164: &'static str,
}

pub const WHATSAPP_NUMBERS: [WhatsAppNumber; 3] = [
    WhatsAppNumber {
        label: "+252 61 234 5678",
        e164: "252612345678",
    },
    WhatsAppNumber {
        label: "+252 62 345 6789",
        e164: "252623456789",
    },
    WhatsAppNumber {
        label: "+252 65 987 6543",
        e164: "252659876543",
    },
];

impl WhatsAppNumber {
    /// Click-to-chat link.
    pub fn link(&self) -> String {
        format!("https://wa.me/{}", self.e164)
    }
}

// =============================================================================
// Contact Info
// =============================================================================

/// Who is asking.
///
/// Fields hold raw form text; trimming happens when the values are read
/// through the accessor methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ContactInfo {
    /// Required.
    pub name: String,
    pub company: String,
    /// Required.
    pub phone: String,
    /// Optional; shape-checked only when present.
    pub email: String,
    /// Free-text notes (destination city, delivery timing, etc.).
    pub notes: String,
}

/// Trimmed value, `None` when empty.
pub(crate) fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

impl ContactInfo {
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn company(&self) -> Option<&str> {
        non_empty(&self.company)
    }

    pub fn phone(&self) -> Option<&str> {
        non_empty(&self.phone)
    }

    pub fn email(&self) -> Option<&str> {
        non_empty(&self.email)
    }

    pub fn notes(&self) -> Option<&str> {
        non_empty(&self.notes)
    }

    /// Checks required fields and the email shape.
    ///
    /// ## Rules
    /// - name: non-empty after trim
    /// - phone: non-empty after trim
    /// - email: when present, `local@domain.tld` shaped
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("name", &self.name)?;
        validate_required("phone", &self.phone)?;
        if let Some(email) = self.email() {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Resets every field to its initial empty value.
    pub fn clear(&mut self) {
        *self = ContactInfo::default();
    }
}
