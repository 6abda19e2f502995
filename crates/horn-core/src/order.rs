//! # Order Request
//!
//! The immutable snapshot sent to the relay, and its plain-text rendering.
//!
//! ## Message Layout
//! ```text
//! ORDER REQUEST
//! Name: Amina
//! Company: (not provided)
//! Phone: +252611112222
//! Email: (not provided)
//!
//! Items:
//! - Chili-Lime Rolled Tortilla Chips (Sample) (SKU: RHG-SN-101)
//!   Quantity: 10 cartons
//!   Size: 92 g
//!   Case pack: 24 x 92 g
//!   MOQ: 10 cartons
//!   Origin: Mexico
//!
//! Total cartons: 10
//!
//! Notes:
//! Deliver to Hargeisa
//! ```
//!
//! Contact fields are always labeled; item details the catalog does not
//! define are omitted; the notes section appears only when there are notes.

use std::fmt::Write;

use serde::Serialize;

use crate::cart::Cart;
use crate::catalog::{Catalog, CatalogItem};
use crate::contact::ContactInfo;
use crate::{NOT_PROVIDED, QUANTITY_UNIT};

/// First line of every order message.
pub const ORDER_HEADER: &str = "ORDER REQUEST";

/// A cart line resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item: CatalogItem,
    /// Validated cartons (0 when the typed text was not a positive number).
    pub quantity: i64,
}

/// Contact + resolved lines, frozen right before a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    contact: ContactInfo,
    lines: Vec<OrderLine>,
    total_quantity: i64,
    unresolved: Vec<String>,
}

impl OrderRequest {
    /// Resolves every cart line against the catalog.
    ///
    /// Lines whose SKU is no longer in the catalog are left out (their SKUs
    /// are kept in [`OrderRequest::unresolved`]); the rest are still
    /// actionable by the recipient.
    pub fn build(contact: &ContactInfo, cart: &Cart, catalog: &Catalog) -> Self {
        let mut lines = Vec::with_capacity(cart.len());
        let mut unresolved = Vec::new();

        for line in cart.lines() {
            match catalog.get(&line.sku) {
                Some(item) => lines.push(OrderLine {
                    item: item.clone(),
                    quantity: line.quantity.value(),
                }),
                None => unresolved.push(line.sku.clone()),
            }
        }

        let total_quantity = lines.iter().map(|l| l.quantity).sum();

        OrderRequest {
            contact: contact.clone(),
            lines,
            total_quantity,
            unresolved,
        }
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// Resolved lines in cart order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.total_quantity
    }

    /// SKUs dropped because the catalog no longer lists them.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Renders the plain-text message body.
    pub fn message(&self) -> String {
        let contact = &self.contact;
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}", ORDER_HEADER);
        for (label, value) in [
            ("Name", contact.name()),
            ("Company", contact.company()),
            ("Phone", contact.phone()),
            ("Email", contact.email()),
        ] {
            let _ = writeln!(out, "{}: {}", label, value.unwrap_or(NOT_PROVIDED));
        }

        out.push_str("\nItems:\n");
        for line in &self.lines {
            write_line(&mut out, line);
        }

        let _ = write!(out, "\nTotal {}: {}", QUANTITY_UNIT, self.total_quantity);

        if let Some(notes) = contact.notes() {
            let _ = write!(out, "\n\nNotes:\n{}", notes);
        }

        out
    }
}

fn write_line(out: &mut String, line: &OrderLine) {
    let item = &line.item;
    let _ = writeln!(out, "- {} (SKU: {})", item.name, item.sku);
    let _ = writeln!(out, "  Quantity: {} {}", line.quantity, QUANTITY_UNIT);

    let details = [
        ("Size", &item.size),
        ("Case pack", &item.case_pack),
        ("MOQ", &item.moq),
        ("Origin", &item.origin),
    ];
    for (label, value) in details {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "  {}: {}", label, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn amina() -> ContactInfo {
        ContactInfo {
            name: "Amina".to_string(),
            company: String::new(),
            phone: "+252611112222".to_string(),
            email: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_message_is_deterministic() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add("RHG-SN-101", "10");

        let order = OrderRequest::build(&amina(), &cart, &catalog);
        let message = order.message();

        assert!(message.starts_with("ORDER REQUEST\n"));
        assert!(message.contains("Name: Amina"));
        assert!(message.contains("Company: (not provided)"));
        assert!(message.contains("Email: (not provided)"));
        assert!(message.contains("- Chili-Lime Rolled Tortilla Chips (Sample) (SKU: RHG-SN-101)"));
        assert!(message.contains("Quantity: 10 cartons"));
        assert!(message.contains("Total cartons: 10"));
        assert!(!message.contains("Notes:"));

        assert_eq!(message, order.message());
        assert_eq!(order.total_quantity(), 10);
    }

    #[test]
    fn test_full_layout() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add("RHG-SN-101", "10");

        let mut contact = amina();
        contact.notes = "  Deliver to Hargeisa ".to_string();

        let expected = "\
ORDER REQUEST
Name: Amina
Company: (not provided)
Phone: +252611112222
Email: (not provided)

Items:
- Chili-Lime Rolled Tortilla Chips (Sample) (SKU: RHG-SN-101)
  Quantity: 10 cartons
  Size: 92 g
  Case pack: 24 x 92 g
  MOQ: 10 cartons
  Origin: Mexico

Total cartons: 10

Notes:
Deliver to Hargeisa";

        assert_eq!(OrderRequest::build(&contact, &cart, &catalog).message(), expected);
    }

    #[test]
    fn test_undefined_item_fields_are_omitted() {
        let catalog = Catalog::new(vec![CatalogItem {
            sku: "BARE-1".to_string(),
            name: "Bare Item".to_string(),
            category: Category::Seasoning,
            brand: None,
            origin: None,
            size: Some("1 kg".to_string()),
            case_pack: None,
            moq: Some("".to_string()),
            notes: None,
            image: String::new(),
        }])
        .unwrap();
        let mut cart = Cart::new();
        cart.add("BARE-1", "3");

        let message = OrderRequest::build(&amina(), &cart, &catalog).message();
        assert!(message.contains("  Size: 1 kg"));
        assert!(!message.contains("Case pack:"));
        assert!(!message.contains("MOQ:"));
        assert!(!message.contains("Origin:"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add("RHG-SN-102", "10"); // A
        cart.add("RHG-CN-201", "10"); // B
        cart.add("RHG-SN-102", "5"); // A again

        let message = OrderRequest::build(&amina(), &cart, &catalog).message();
        let a = message.find("SKU: RHG-SN-102").unwrap();
        let b = message.find("SKU: RHG-CN-201").unwrap();
        assert!(a < b);
        assert!(message.contains("Quantity: 15 cartons"));
        assert!(message.contains("Total cartons: 25"));
    }

    #[test]
    fn test_unresolvable_lines_are_dropped() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add("RHG-SN-101", "10");
        cart.add("DISCONTINUED-1", "50");

        let order = OrderRequest::build(&amina(), &cart, &catalog);
        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.unresolved(), ["DISCONTINUED-1".to_string()]);
        assert_eq!(order.total_quantity(), 10);
        assert!(!order.message().contains("DISCONTINUED-1"));
    }

    #[test]
    fn test_invalid_quantity_renders_as_zero() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add("RHG-SE-301", "5");
        cart.set_quantity("RHG-SE-301", "five");

        let order = OrderRequest::build(&amina(), &cart, &catalog);
        assert!(order.message().contains("Quantity: 0 cartons"));
        assert_eq!(order.total_quantity(), 0);
    }
}
