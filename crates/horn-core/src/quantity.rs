//! # Quantity
//!
//! Order quantities are edited as free text and validated late.
//!
//! ## Two-Phase Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Input box  ──►  RawQuantity("1")   (stored verbatim, may be "", "1a") │
//! │                        │                                                │
//! │                        │  only at validation / formatting time          │
//! │                        ▼                                                │
//! │                   value() -> i64     (non-numeric or ≤ 0  ⇒  0)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Users may type transient invalid values while editing; nothing here ever
//! rejects input.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Quantity exactly as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct RawQuantity(String);

impl RawQuantity {
    /// Wraps text verbatim.
    pub fn new(text: impl Into<String>) -> Self {
        RawQuantity(text.into())
    }

    /// Stores an already-derived integer.
    pub fn from_value(value: i64) -> Self {
        RawQuantity(value.to_string())
    }

    /// The text as typed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Signed integer parse of the trimmed text, `None` when not a number.
    pub fn parse(&self) -> Option<i64> {
        self.0.trim().parse::<i64>().ok()
    }

    /// The validated carton count.
    ///
    /// Non-numeric, zero and negative text all yield 0.
    pub fn value(&self) -> i64 {
        match self.parse() {
            Some(n) if n > 0 => n,
            _ => 0,
        }
    }
}

impl From<&str> for RawQuantity {
    fn from(text: &str) -> Self {
        RawQuantity::new(text)
    }
}

impl From<String> for RawQuantity {
    fn from(text: String) -> Self {
        RawQuantity(text)
    }
}

impl std::fmt::Display for RawQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
