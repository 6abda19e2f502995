//! # Minimum Order Quantity
//!
//! Derives, per cart line, whether the requested cartons meet the item's
//! minimum, and from that the submission gate.
//!
//! ## Gate Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  (Cart, Catalog) ──► check_cart() ──► MoqReport ──► gate()             │
//! │                                                                         │
//! │  per line:                                                              │
//! │    minimum  = first integer in item.moq   ("10 cartons" → 10)          │
//! │    quantity = line text parsed            ("abc" → 0)                  │
//! │    violation ⇔ minimum exists AND quantity < minimum                   │
//! │                                                                         │
//! │  gate:                                                                  │
//! │    no lines            → EmptyCart                                      │
//! │    any violation       → MoqViolations([skus])                          │
//! │    otherwise           → Ready                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The report is a pure function of its inputs and is recomputed on every
//! read, so it can never go stale after a cart mutation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::catalog::Catalog;

/// Extracts the first run of ASCII digits from an MOQ descriptor.
/// A run too long for `i64` saturates to `i64::MAX`.
///
/// ```rust
/// use horn_core::moq::parse_moq;
///
/// assert_eq!(parse_moq("10 cartons"), Some(10));
/// assert_eq!(parse_moq("min. 5 cartons / 2 pallets"), Some(5));
/// assert_eq!(parse_moq("ask sales"), None);
/// ```
pub fn parse_moq(descriptor: &str) -> Option<i64> {
    let start = descriptor.find(|c: char| c.is_ascii_digit())?;
    let digits: String = descriptor[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some(digits.parse().unwrap_or(i64::MAX))
}

/// MOQ outcome for a single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineCheck {
    pub sku: String,

    /// Validated quantity (0 when the text is not a positive number).
    pub quantity: i64,

    /// Enforced minimum, if the item defines one.
    pub minimum: Option<i64>,

    pub violation: bool,
}

/// MOQ outcome for the whole cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoqReport {
    lines: Vec<LineCheck>,
}

/// Whether an order may be sent, and if not, why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "skus", rename_all = "camelCase")]
#[ts(export)]
pub enum SubmissionGate {
    Ready,
    EmptyCart,
    /// SKUs below their minimum, in cart order.
    MoqViolations(Vec<String>),
}

impl SubmissionGate {
    pub fn is_ready(&self) -> bool {
        matches!(self, SubmissionGate::Ready)
    }
}

/// Checks every cart line against its catalog minimum.
///
/// Lines whose SKU is not in the catalog have no minimum and never violate;
/// they still count toward the cart being non-empty.
pub fn check_cart(cart: &Cart, catalog: &Catalog) -> MoqReport {
    let lines = cart
        .lines()
        .iter()
        .map(|line| {
            let quantity = line.quantity.value();
            let minimum = catalog
                .get(&line.sku)
                .and_then(|item| item.minimum_quantity());
            LineCheck {
                sku: line.sku.clone(),
                quantity,
                minimum,
                violation: minimum.is_some_and(|min| quantity < min),
            }
        })
        .collect();

    MoqReport { lines }
}

impl MoqReport {
    pub fn lines(&self) -> &[LineCheck] {
        &self.lines
    }

    /// Lines below their minimum.
    pub fn violations(&self) -> impl Iterator<Item = &LineCheck> {
        self.lines.iter().filter(|l| l.violation)
    }

    pub fn has_violations(&self) -> bool {
        self.violations().next().is_some()
    }

    /// The aggregate submission gate.
    pub fn gate(&self) -> SubmissionGate {
        if self.lines.is_empty() {
            return SubmissionGate::EmptyCart;
        }

        let skus: Vec<String> = self.violations().map(|l| l.sku.clone()).collect();
        if skus.is_empty() {
            SubmissionGate::Ready
        } else {
            SubmissionGate::MoqViolations(skus)
        }
    }
}
