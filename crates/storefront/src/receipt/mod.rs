//! Receipt generation.
//!
//! A receipt is a snapshot of the cart at download time. It is produced in
//! one of two ways, chosen by [`ReceiptMode`]:
//!
//! - `local` - rendered to PDF in-process ([`pdf::render`])
//! - `remote` - the cart is posted to the billing server, which returns the PDF
//!
//! An empty cart never reaches either renderer.

pub mod pdf;

use chrono::{DateTime, Local};
use erashid_core::{Cart, Price, PriceError};
use thiserror::Error;
use tracing::instrument;

use crate::billing::{BillingClient, BillingError};
use crate::config::ReceiptMode;

/// File name offered to the browser.
pub const RECEIPT_FILENAME: &str = "e-rashid-receipt.pdf";

/// Shown to the visitor when a receipt could not be produced.
pub const DOWNLOAD_FAILED_MESSAGE: &str = "PDF download failed. Please try again.";

/// Errors from receipt generation.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Nothing to put on a receipt.
    #[error("Your cart is empty.")]
    EmptyCart,

    /// Remote rendering failed.
    #[error("Billing error: {0}")]
    Billing(#[from] BillingError),

    /// Line totals could not be computed.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PriceError),

    /// Local PDF rendering failed.
    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// One row of the receipt table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLineView {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub subtotal: Price,
}

/// Everything printed on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptView {
    pub lines: Vec<ReceiptLineView>,
    pub total: Price,
    pub item_count: u32,
    pub date: String,
}

impl ReceiptView {
    /// Snapshot `cart` at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if a line total or the total overflows.
    pub fn new(cart: &Cart, issued_at: DateTime<Local>) -> Result<Self, PriceError> {
        let lines = cart
            .lines()
            .iter()
            .map(|line| {
                Ok(ReceiptLineView {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.price,
                    subtotal: line.line_total()?,
                })
            })
            .collect::<Result<Vec<_>, PriceError>>()?;

        Ok(Self {
            lines,
            total: cart.subtotal()?,
            item_count: cart.item_count(),
            date: format_receipt_date(issued_at),
        })
    }
}

/// Long-form date with minutes, e.g. `3 March 2026, 02:05 PM`.
#[must_use]
pub fn format_receipt_date(at: DateTime<Local>) -> String {
    at.format("%-d %B %Y, %I:%M %p").to_string()
}

/// Produce the receipt PDF for `cart`.
///
/// # Errors
///
/// Returns [`ReceiptError::EmptyCart`] without rendering or calling the
/// billing server when the cart is empty; otherwise any rendering or billing
/// failure.
#[instrument(skip(billing, cart), fields(lines = cart.lines().len()))]
pub async fn generate(
    mode: ReceiptMode,
    billing: &BillingClient,
    cart: &Cart,
    issued_at: DateTime<Local>,
) -> Result<Vec<u8>, ReceiptError> {
    if cart.is_empty() {
        return Err(ReceiptError::EmptyCart);
    }

    match mode {
        ReceiptMode::Local => pdf::render(&ReceiptView::new(cart, issued_at)?),
        ReceiptMode::Remote => Ok(billing.generate_receipt(cart.lines()).await?),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Router, routing::post};
    use chrono::TimeZone;
    use erashid_core::{ProductId, ProductSummary};
    use tokio::net::TcpListener;

    use super::*;
    use crate::config::BillingConfig;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        for (id, price) in [("a", 100), ("a", 100), ("b", 50)] {
            cart.add(ProductSummary {
                id: ProductId::new(id),
                name: format!("Product {id}"),
                price: Price::from(price),
                image: String::new(),
                description: String::new(),
            });
        }
        cart
    }

    fn issued_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 3, 14, 5, 0).unwrap()
    }

    /// Billing stub counting receipt requests.
    async fn counting_billing() -> (BillingClient, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/generate-receipt",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    b"%PDF-1.4 remote".to_vec()
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let billing =
            BillingClient::new(&BillingConfig::new(&format!("http://{addr}")).unwrap()).unwrap();
        (billing, hits)
    }

    #[test]
    fn test_view_totals() {
        let view = ReceiptView::new(&cart(), issued_at()).unwrap();
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(view.lines[0].unit_price, Price::from(100));
        assert_eq!(view.lines[0].subtotal, Price::from(200));
        assert_eq!(view.total, Price::from(250));
        assert_eq!(view.item_count, 3);
    }

    #[tokio::test]
    async fn test_overflowing_cart_fails_without_panicking() {
        let (billing, hits) = counting_billing().await;
        let cart: Cart =
            serde_json::from_str(r#"[{"id": "a", "name": "A", "price": 7.0e28, "quantity": 2}]"#)
                .unwrap();

        assert!(ReceiptView::new(&cart, issued_at()).is_err());
        let err = generate(ReceiptMode::Local, &billing, &cart, issued_at())
            .await
            .unwrap_err();
        assert!(matches!(err, ReceiptError::Pricing(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_date_format() {
        assert_eq!(format_receipt_date(issued_at()), "3 March 2026, 02:05 PM");
    }

    #[tokio::test]
    async fn test_empty_cart_makes_no_calls() {
        let (billing, hits) = counting_billing().await;

        for mode in [ReceiptMode::Local, ReceiptMode::Remote] {
            let err = generate(mode, &billing, &Cart::new(), issued_at())
                .await
                .unwrap_err();
            assert!(matches!(err, ReceiptError::EmptyCart));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_mode_renders_without_billing() {
        let (billing, hits) = counting_billing().await;

        let pdf = generate(ReceiptMode::Local, &billing, &cart(), issued_at())
            .await
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_mode_relays_billing_pdf() {
        let (billing, hits) = counting_billing().await;

        let pdf = generate(ReceiptMode::Remote, &billing, &cart(), issued_at())
            .await
            .unwrap();
        assert_eq!(pdf, b"%PDF-1.4 remote".to_vec());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_cart_message() {
        assert_eq!(ReceiptError::EmptyCart.to_string(), "Your cart is empty.");
    }
}
