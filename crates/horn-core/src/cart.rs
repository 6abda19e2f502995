//! # Cart
//!
//! The in-progress order: an insertion-ordered mapping from SKU to the
//! quantity text the customer typed.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Form Action              Operation                Cart Change          │
//! │  ───────────              ─────────                ───────────          │
//! │                                                                         │
//! │  Click "Add" ────────────► add(sku, qty) ────────► push or bump line    │
//! │                                                                         │
//! │  Edit quantity box ──────► set_quantity(sku, t) ─► line.qty = t        │
//! │                                                                         │
//! │  Click remove ───────────► remove(sku) ──────────► line dropped        │
//! │                                                                         │
//! │  Sent / reset ───────────► clear() ──────────────► lines.clear()       │
//! │                                                                         │
//! │  NOTE: every operation is total. Nothing is validated here; the MOQ    │
//! │        gate and the formatter parse quantities when they need them.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::quantity::RawQuantity;

/// One (catalog item, quantity) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Catalog SKU.
    pub sku: String,

    /// Quantity text, validated at submission time.
    pub quantity: RawQuantity,
}

/// The order cart.
///
/// ## Invariants
/// - Lines are unique by `sku` (adding the same SKU bumps its quantity)
/// - Line order is insertion order; a bump never moves a line
/// - After `add`, a line never holds a zero or negative quantity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds an item or bumps the quantity of an existing line.
    ///
    /// ## Behavior
    /// - SKU already present: existing + added, where unparseable text counts
    ///   as 0. A combined result of 0 or less is floored to 1.
    /// - SKU absent: new line at the end holding `quantity` verbatim, or "1"
    ///   when `quantity` is empty, not a number, or not positive.
    pub fn add(&mut self, sku: &str, quantity: &str) {
        let added = RawQuantity::from(quantity);

        if let Some(line) = self.lines.iter_mut().find(|l| l.sku == sku) {
            let current = line.quantity.parse().unwrap_or(0);
            let combined = current.saturating_add(added.parse().unwrap_or(0));
            line.quantity = RawQuantity::from_value(combined.max(1));
            return;
        }

        let quantity = if added.value() > 0 {
            added
        } else {
            RawQuantity::from_value(1)
        };
        self.lines.push(CartLine {
            sku: sku.to_string(),
            quantity,
        });
    }

    /// Removes a line. No-op when the SKU is not in the cart.
    pub fn remove(&mut self, sku: &str) {
        self.lines.retain(|l| l.sku != sku);
    }

    /// Replaces a line's quantity text verbatim.
    ///
    /// No-op when the SKU is not in the cart.
    pub fn set_quantity(&mut self, sku: &str, text: &str) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.sku == sku) {
            line.quantity = RawQuantity::from(text);
        }
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, sku: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.sku == sku)
    }

    /// Returns the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of validated quantities (invalid text counts as 0).
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity.value()).sum()
    }
}
