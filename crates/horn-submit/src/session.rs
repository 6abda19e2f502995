//! # Order Session
//!
//! State behind the order page: the cart, the contact form, and the
//! submission status.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  begin_submit(now)                                                      │
//! │    ├── Sending already?        → Err(Busy), nothing changes            │
//! │    ├── gate(): EmptyCart       → Error(EmptyCart)                      │
//! │    ├── gate(): MoqViolations   → Error(MoqViolation)                   │
//! │    ├── contact.validate()      → Error(InvalidContact)                 │
//! │    ├── render attachment       → Error(AttachmentFailed | TooLarge)    │
//! │    └── ok                      → Sending, returns PreparedSubmission   │
//! │                                                                         │
//! │  relay.send(payload).await          (caller holds no lock here)        │
//! │                                                                         │
//! │  finish_submit(outcome)                                                 │
//! │    ├── Ok  → Sent, cart + contact cleared                              │
//! │    └── Err → Error(Relay), cart + contact kept                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use horn_core::limits::ATTACHMENT_BASE64_MAX;
use horn_core::moq::{check_cart, MoqReport, SubmissionGate};
use horn_core::{
    Cart, Catalog, ContactInfo, CoreError, DocumentRenderer, OrderRequest, PdfRenderer,
    RelayPayload,
};
use tracing::{debug, info, warn};

use crate::client::RelayClient;
use crate::config::ClientConfig;
use crate::error::SubmitResult;
use crate::status::{StatusMachine, SubmitFailure, SubmitStatus};

/// A validated submission, ready to be sent.
#[derive(Debug, Clone)]
pub struct PreparedSubmission {
    pub payload: RelayPayload,
    pub issued_at: DateTime<Utc>,
}

pub struct OrderSession {
    catalog: Arc<Catalog>,
    cart: Cart,
    contact: ContactInfo,
    machine: StatusMachine,
    renderer: Option<Arc<dyn DocumentRenderer>>,
}

impl std::fmt::Debug for OrderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSession")
            .field("cart", &self.cart)
            .field("contact", &self.contact)
            .field("status", self.machine.status())
            .field("attaches_document", &self.renderer.is_some())
            .finish()
    }
}

impl OrderSession {
    /// A session that sends the plain-text message only.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        OrderSession {
            catalog,
            cart: Cart::new(),
            contact: ContactInfo::default(),
            machine: StatusMachine::default(),
            renderer: None,
        }
    }

    /// A session configured from [`ClientConfig`] (PDF attached when
    /// `order.attach_pdf` is set).
    pub fn from_config(catalog: Arc<Catalog>, config: &ClientConfig) -> Self {
        let session = OrderSession::new(catalog);
        if config.order.attach_pdf {
            session.with_renderer(Arc::new(PdfRenderer::default()))
        } else {
            session
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds `quantity` cartons of a catalog item (see [`Cart::add`]).
    ///
    /// Cart edits are refused with `Busy` while a submission is in flight;
    /// the cart is cleared once it is sent.
    pub fn add_item(&mut self, sku: &str, quantity: &str) -> SubmitResult<()> {
        self.machine.ensure_idle()?;
        if !self.catalog.contains(sku) {
            return Err(CoreError::ProductNotFound(sku.to_string()).into());
        }
        self.cart.add(sku, quantity);
        debug!(sku = %sku, quantity = %quantity, "Added to cart");
        Ok(())
    }

    pub fn remove_item(&mut self, sku: &str) -> SubmitResult<()> {
        self.machine.ensure_idle()?;
        self.cart.remove(sku);
        debug!(sku = %sku, "Removed from cart");
        Ok(())
    }

    /// Stores the typed text verbatim; validation happens at read time.
    pub fn set_quantity(&mut self, sku: &str, text: &str) -> SubmitResult<()> {
        self.machine.ensure_idle()?;
        self.cart.set_quantity(sku, text);
        Ok(())
    }

    pub fn clear_cart(&mut self) -> SubmitResult<()> {
        self.machine.ensure_idle()?;
        self.cart.clear();
        Ok(())
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // =========================================================================
    // Contact
    // =========================================================================

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactInfo {
        &mut self.contact
    }

    // =========================================================================
    // Derived State
    // =========================================================================

    /// Recomputed on every call.
    pub fn moq_report(&self) -> MoqReport {
        check_cart(&self.cart, &self.catalog)
    }

    pub fn gate(&self) -> SubmissionGate {
        self.moq_report().gate()
    }

    /// The order as it would be sent right now.
    pub fn order(&self) -> OrderRequest {
        OrderRequest::build(&self.contact, &self.cart, &self.catalog)
    }

    pub fn status(&self) -> &SubmitStatus {
        self.machine.status()
    }

    /// Returns a finished form (`Sent` or `Error`) to `Idle`.
    pub fn acknowledge(&mut self) {
        self.machine.acknowledge();
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Runs the local guards and, if they pass, enters `Sending`.
    ///
    /// `Err(Busy)` leaves the state untouched; `Err(Refused(_))` has already
    /// moved it to `Error`.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> SubmitResult<PreparedSubmission> {
        self.machine.ensure_idle()?;

        match self.gate() {
            SubmissionGate::Ready => {}
            SubmissionGate::EmptyCart => {
                return Err(self.machine.refuse(SubmitFailure::EmptyCart));
            }
            SubmissionGate::MoqViolations(skus) => {
                info!(skus = ?skus, "Order blocked by minimum order quantities");
                return Err(self.machine.refuse(SubmitFailure::MoqViolation { skus }));
            }
        }

        if let Err(e) = self.contact.validate() {
            return Err(self.machine.refuse(SubmitFailure::InvalidContact {
                field: e.field().to_string(),
                message: e.to_string(),
            }));
        }

        let order = self.order();
        for sku in order.unresolved() {
            warn!(sku = %sku, "Cart line no longer in catalog, left out of order");
        }

        let mut payload = RelayPayload::for_order(&order);

        if let Some(renderer) = &self.renderer {
            let attachment = match renderer.render(&order, now) {
                Ok(attachment) => attachment,
                Err(e) => {
                    warn!(error = %e, "Order document rendering failed");
                    return Err(self.machine.refuse(SubmitFailure::AttachmentFailed {
                        reason: e.to_string(),
                    }));
                }
            };

            payload = payload.with_attachment(&attachment);
            let size = payload.attachment_base64.as_ref().map_or(0, String::len);
            if size > ATTACHMENT_BASE64_MAX {
                return Err(self.machine.refuse(SubmitFailure::AttachmentTooLarge {
                    size,
                    max: ATTACHMENT_BASE64_MAX,
                }));
            }
        }

        self.machine.start();
        info!(
            lines = order.lines().len(),
            total = order.total_quantity(),
            attachment = payload.has_attachment(),
            "Order submission started"
        );

        Ok(PreparedSubmission {
            payload,
            issued_at: now,
        })
    }

    /// Applies the relay outcome. On success the cart and contact are cleared.
    pub fn finish_submit(&mut self, outcome: SubmitResult<()>) -> &SubmitStatus {
        if let Err(e) = &outcome {
            warn!(error = %e, retryable = e.is_retryable(), "Order submission failed");
        }

        if self.machine.finish(&outcome) {
            self.cart.clear();
            self.contact.clear();
            info!("Order submission sent");
        }

        self.machine.status()
    }

    /// `begin_submit`, one relay call, `finish_submit`.
    pub async fn submit(&mut self, relay: &dyn RelayClient, now: DateTime<Utc>) -> &SubmitStatus {
        let prepared = match self.begin_submit(now) {
            Ok(prepared) => prepared,
            Err(e) => {
                debug!(error = %e, "Order not sent");
                return self.machine.status();
            }
        };

        let outcome = relay.send(&prepared.payload).await;
        self.finish_submit(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubmitError;
    use crate::testing::FakeRelay;
    use chrono::TimeZone;
    use horn_core::{Attachment, CoreResult, InquiryType};
    use tokio::sync::Mutex;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    fn session() -> OrderSession {
        OrderSession::new(Arc::new(Catalog::builtin()))
    }

    fn fill_contact(session: &mut OrderSession) {
        let contact = session.contact_mut();
        contact.name = "Amina".into();
        contact.phone = "+252611112222".into();
        contact.notes = "Deliver to Hargeisa".into();
    }

    #[test]
    fn test_add_unknown_product() {
        let mut session = session();
        assert!(matches!(
            session.add_item("NOPE-1", "5"),
            Err(SubmitError::Core(CoreError::ProductNotFound(_)))
        ));
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submission_clears_form() {
        let relay = FakeRelay::succeeding();
        let mut session = session();
        session.add_item("RHG-SN-101", "10").unwrap();
        fill_contact(&mut session);

        let status = session.submit(&relay, now()).await.clone();

        assert_eq!(status, SubmitStatus::Sent);
        assert!(session.cart().is_empty());
        assert_eq!(session.contact(), &ContactInfo::default());

        let sent = relay.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].inquiry_type, InquiryType::Orders);
        assert!(sent[0].message.contains("Quantity: 10 cartons"));
        assert!(sent[0].message.contains("Deliver to Hargeisa"));
        assert!(!sent[0].has_attachment());
    }

    #[tokio::test]
    async fn test_empty_cart_never_reaches_relay() {
        let relay = FakeRelay::succeeding();
        let mut session = session();
        fill_contact(&mut session);

        let status = session.submit(&relay, now()).await;
        assert_eq!(status.failure(), Some(&SubmitFailure::EmptyCart));
        assert!(relay.sent().is_empty());
    }

    #[tokio::test]
    async fn test_moq_violation_blocks_submission() {
        let relay = FakeRelay::succeeding();
        let mut session = session();
        session.add_item("RHG-SE-301", "2").unwrap(); // MOQ 5
        fill_contact(&mut session);

        let status = session.submit(&relay, now()).await.clone();
        assert_eq!(
            status,
            SubmitStatus::Error(SubmitFailure::MoqViolation {
                skus: vec!["RHG-SE-301".into()]
            })
        );
        assert!(relay.sent().is_empty());
        assert_eq!(session.cart().len(), 1);

        // Raising the quantity unblocks the same cart
        session.set_quantity("RHG-SE-301", "5").unwrap();
        assert!(session.gate().is_ready());
        assert_eq!(session.submit(&relay, now()).await, &SubmitStatus::Sent);
    }

    #[tokio::test]
    async fn test_missing_contact_is_local() {
        let relay = FakeRelay::succeeding();
        let mut session = session();
        session.add_item("RHG-SN-101", "10").unwrap();
        session.contact_mut().name = "Amina".into();

        let status = session.submit(&relay, now()).await;
        match status.failure() {
            Some(SubmitFailure::InvalidContact { field, .. }) => assert_eq!(field, "phone"),
            other => panic!("expected InvalidContact, got {:?}", other),
        }
        assert!(relay.sent().is_empty());
    }

    #[tokio::test]
    async fn test_relay_failure_keeps_form() {
        let relay = FakeRelay::failing();
        let mut session = session();
        session.add_item("RHG-SN-101", "10").unwrap();
        fill_contact(&mut session);

        let status = session.submit(&relay, now()).await.clone();
        assert_eq!(status, SubmitStatus::Error(SubmitFailure::Relay));
        assert_eq!(session.cart().len(), 1);
        assert_eq!(session.contact().name, "Amina");
        assert_eq!(relay.sent().len(), 1);
    }

    #[test]
    fn test_begin_submit_while_sending_is_busy() {
        let mut session = session();
        session.add_item("RHG-SN-101", "10").unwrap();
        fill_contact(&mut session);

        session.begin_submit(now()).unwrap();
        assert!(session.status().is_busy());

        assert!(matches!(session.begin_submit(now()), Err(SubmitError::Busy)));
        assert!(session.status().is_busy());

        session.finish_submit(Ok(()));
        assert!(session.status().is_sent());
    }

    #[test]
    fn test_cart_is_frozen_while_sending() {
        let mut session = session();
        session.add_item("RHG-SN-101", "10").unwrap();
        fill_contact(&mut session);

        session.begin_submit(now()).unwrap();

        assert!(matches!(session.add_item("RHG-SN-102", "10"), Err(SubmitError::Busy)));
        assert!(matches!(session.set_quantity("RHG-SN-101", "50"), Err(SubmitError::Busy)));
        assert!(matches!(session.remove_item("RHG-SN-101"), Err(SubmitError::Busy)));
        assert!(matches!(session.clear_cart(), Err(SubmitError::Busy)));
        assert_eq!(session.cart().len(), 1);
        assert_eq!(session.cart().total_quantity(), 10);

        // A failed send reopens the cart with the lines that were sent
        session.finish_submit(Err(SubmitError::Timeout(15)));
        session.add_item("RHG-SN-102", "10").unwrap();
        assert_eq!(session.cart().len(), 2);
    }

    #[tokio::test]
    async fn test_split_api_behind_mutex() {
        let relay = FakeRelay::succeeding();
        let shared = Arc::new(Mutex::new(session()));
        {
            let mut session = shared.lock().await;
            session.add_item("RHG-CN-201", "10").unwrap();
            fill_contact(&mut session);
        }

        let prepared = shared.lock().await.begin_submit(now()).unwrap();

        // A second click while the request is in flight
        assert!(matches!(
            shared.lock().await.begin_submit(now()),
            Err(SubmitError::Busy)
        ));

        let outcome = relay.send(&prepared.payload).await;
        let status = shared.lock().await.finish_submit(outcome).clone();
        assert_eq!(status, SubmitStatus::Sent);
        assert_eq!(relay.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_pdf_attachment() {
        let relay = FakeRelay::succeeding();
        let mut session = OrderSession::from_config(
            Arc::new(Catalog::builtin()),
            &ClientConfig::default(),
        );
        session.add_item("RHG-SN-101", "10").unwrap();
        fill_contact(&mut session);

        session.submit(&relay, now()).await;

        let sent = relay.sent();
        assert_eq!(
            sent[0].attachment_name.as_deref(),
            Some("risinghorn-order-20260314-092653.pdf")
        );
        assert!(sent[0]
            .attachment_base64
            .as_deref()
            .unwrap()
            .starts_with("JVBERi0xLj")); // "%PDF-1."
    }

    struct HugeRenderer;

    impl DocumentRenderer for HugeRenderer {
        fn render(&self, _order: &OrderRequest, _issued_at: DateTime<Utc>) -> CoreResult<Attachment> {
            Ok(Attachment {
                filename: "huge.pdf".into(),
                content_type: "application/pdf".into(),
                bytes: vec![0u8; ATTACHMENT_BASE64_MAX],
            })
        }
    }

    struct BrokenRenderer;

    impl DocumentRenderer for BrokenRenderer {
        fn render(&self, _order: &OrderRequest, _issued_at: DateTime<Utc>) -> CoreResult<Attachment> {
            Err(CoreError::RenderFailed {
                format: "pdf".into(),
                reason: "out of paper".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_oversized_attachment_is_local() {
        let relay = FakeRelay::succeeding();
        let mut session = session().with_renderer(Arc::new(HugeRenderer));
        session.add_item("RHG-SN-101", "10").unwrap();
        fill_contact(&mut session);

        let status = session.submit(&relay, now()).await;
        assert!(matches!(
            status.failure(),
            Some(SubmitFailure::AttachmentTooLarge { .. })
        ));
        assert!(relay.sent().is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_is_local() {
        let relay = FakeRelay::succeeding();
        let mut session = session().with_renderer(Arc::new(BrokenRenderer));
        session.add_item("RHG-SN-101", "10").unwrap();
        fill_contact(&mut session);

        let status = session.submit(&relay, now()).await;
        assert!(matches!(
            status.failure(),
            Some(SubmitFailure::AttachmentFailed { .. })
        ));
        assert!(relay.sent().is_empty());
    }

    #[tokio::test]
    async fn test_error_then_resubmit() {
        let relay = FakeRelay::succeeding();
        let mut session = session();
        fill_contact(&mut session);

        session.submit(&relay, now()).await;
        assert!(session.status().failure().is_some());

        session.add_item("RHG-SN-102", "10").unwrap();
        assert_eq!(session.submit(&relay, now()).await, &SubmitStatus::Sent);
    }
}
