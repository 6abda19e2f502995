//! # horn-core: Pure Order-Intake Logic for RisingHorn
//!
//! This crate is the **heart** of the order pipeline. It contains all business
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     RisingHorn Order Pipeline                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Site (Order / Contact pages)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               horn-submit (sessions, relay client)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ horn-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌───────────────────┐ │   │
//! │  │   │ catalog │  │  cart   │  │   moq   │  │ order / document  │ │   │
//! │  │   │ items   │  │ lines   │  │  gate   │  │ message + PDF     │ │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └───────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ RelayPayload (JSON)                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 relay-api (POST /api/contact)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Catalog items and the built-in sample catalog
//! - [`quantity`] - Raw (editable) quantity text and its derived value
//! - [`cart`] - Insertion-ordered cart of raw quantities
//! - [`moq`] - Minimum-order-quantity checks and the submission gate
//! - [`contact`] - Contact fields and the company contact directory
//! - [`order`] - Resolved order request and the plain-text message
//! - [`document`] - Pluggable attachment renderers (PDF)
//! - [`payload`] - The JSON payload accepted by the mail relay
//! - [`validation`] - Field validators shared by client and relay
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use horn_core::{Cart, Catalog, ContactInfo, OrderRequest};
//!
//! let catalog = Catalog::builtin();
//! let mut cart = Cart::new();
//! cart.add("RHG-SN-101", "10");
//!
//! let contact = ContactInfo {
//!     name: "Amina".into(),
//!     phone: "+252611112222".into(),
//!     ..ContactInfo::default()
//! };
//!
//! let order = OrderRequest::build(&contact, &cart, &catalog);
//! assert_eq!(order.total_quantity(), 10);
//! assert!(order.message().contains("Quantity: 10 cartons"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod contact;
pub mod document;
pub mod error;
pub mod moq;
pub mod order;
pub mod payload;
pub mod quantity;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, CatalogItem, Category};
pub use contact::ContactInfo;
pub use document::{Attachment, DocumentRenderer, PdfRenderer};
pub use error::{CoreError, CoreResult, ValidationError};
pub use moq::{MoqReport, SubmissionGate};
pub use order::{OrderLine, OrderRequest};
pub use payload::{InquiryType, RelayPayload};
pub use quantity::RawQuantity;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Unit every order quantity is expressed in.
pub const QUANTITY_UNIT: &str = "cartons";

/// Placeholder rendered for contact fields the customer left empty.
///
/// The recipient always sees a labeled field, never a silently missing one.
pub const NOT_PROVIDED: &str = "(not provided)";

/// Relay-side field limits (characters).
pub mod limits {
    pub const NAME_MAX: usize = 120;
    pub const COMPANY_MAX: usize = 200;
    pub const EMAIL_MAX: usize = 200;
    pub const PHONE_MAX: usize = 60;
    pub const MESSAGE_MIN: usize = 5;
    pub const MESSAGE_MAX: usize = 8000;
    /// Base64 characters, roughly 2.2 MB of binary.
    pub const ATTACHMENT_BASE64_MAX: usize = 3_000_000;
}
