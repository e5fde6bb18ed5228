//! Billing server API client.
//!
//! The billing server owns the product catalog and can render receipts:
//!
//! - `GET  /api/products` - array of product records
//! - `POST /api/generate-receipt` - `{ "cart": [...] }` in, PDF bytes out
//!
//! Calls are made once per user action with no retry; failures surface as
//! [`BillingError`] and are handled by the caller.

use std::sync::Arc;

use erashid_core::{CartLine, Product};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::BillingConfig;

const PRODUCTS_PATH: &str = "api/products";
const GENERATE_RECEIPT_PATH: &str = "api/generate-receipt";

/// Errors that can occur when talking to the billing server.
#[derive(Debug, Error)]
pub enum BillingError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Billing server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The receipt endpoint did not return a PDF document.
    #[error("Receipt response is not a PDF ({0})")]
    NotPdf(String),
}

/// Request body for remote receipt generation.
#[derive(Debug, Serialize)]
struct GenerateReceiptRequest<'a> {
    cart: &'a [CartLine],
}

/// Client for the billing server.
///
/// Cheaply cloneable; clones share the connection pool.
#[derive(Clone)]
pub struct BillingClient {
    inner: Arc<BillingClientInner>,
}

struct BillingClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BillingClient {
    /// Create a new billing client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed (TLS
    /// backend initialization).
    pub fn new(config: &BillingConfig) -> Result<Self, BillingError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("erashid-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(BillingClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BillingError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Fetch the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body is not a product array.
    #[instrument(skip(self), fields(base_url = %self.inner.base_url))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, BillingError> {
        let url = self.endpoint(PRODUCTS_PATH)?;
        let response = self.inner.client.get(url).send().await?;
        let response = check_status(response).await?;

        // Read as text first for better error diagnostics
        let body = response.text().await?;
        let products: Vec<Product> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body, 500),
                "Failed to parse product list"
            );
            BillingError::Parse(e)
        })?;

        tracing::debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Ask the billing server to render a receipt for `lines`.
    ///
    /// Returns the PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body is not a PDF document.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn generate_receipt(&self, lines: &[CartLine]) -> Result<Vec<u8>, BillingError> {
        let url = self.endpoint(GENERATE_RECEIPT_PATH)?;
        let response = self
            .inner
            .client
            .post(url)
            .json(&GenerateReceiptRequest { cart: lines })
            .send()
            .await?;
        let response = check_status(response).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let bytes = response.bytes().await?;

        if !bytes.starts_with(b"%PDF") {
            return Err(BillingError::NotPdf(content_type));
        }

        tracing::debug!(size = bytes.len(), "Received receipt PDF");
        Ok(bytes.to_vec())
    }
}

/// Turn non-success responses into [`BillingError::Status`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BillingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!(
        status = %status,
        body = %truncate(&body, 500),
        "Billing server returned non-success status"
    );
    Err(BillingError::Status {
        status,
        body: truncate(&body, 200),
    })
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
