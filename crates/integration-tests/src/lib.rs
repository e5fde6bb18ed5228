//! Integration test harness for the e-Rashid storefront.
//!
//! Each [`TestContext`] starts two servers on ephemeral ports:
//!
//! - a stub billing server answering `GET /api/products` with a fixed
//!   catalog and `POST /api/generate-receipt` with a canned PDF, recording
//!   every receipt request it sees
//! - the real storefront router, configured against the stub
//!
//! and a `reqwest` client with a cookie store, so the visitor's session (and
//! therefore the cart) survives across requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p erashid-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use axum::{Json, Router, http::StatusCode, routing::get, routing::post};
use erashid_storefront::config::{BillingConfig, ReceiptMode, StorefrontConfig};
use erashid_storefront::state::AppState;
use reqwest::Client;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// PDF body returned by the stub billing server.
pub const STUB_RECEIPT_PDF: &[u8] = b"%PDF-1.4\n% stub receipt\n%%EOF\n";

/// How the stub billing server should behave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BillingBehavior {
    /// Serve the catalog and receipts.
    #[default]
    Healthy,
    /// Serve the catalog; fail every receipt request with 500.
    ReceiptFails,
    /// Fail the catalog request with 500.
    CatalogFails,
}

/// The fixed catalog served by the stub billing server.
///
/// Mixes `_id` and `id`, string and numeric identifiers, and integral and
/// fractional prices the way the billing server's documents do.
#[must_use]
pub fn stub_catalog() -> Value {
    json!([
        {
            "_id": "a",
            "name": "Darjeeling Tea",
            "description": "First flush, 250g tin",
            "category": "Beverages",
            "image": "https://images.example.com/tea.jpg",
            "price": 100,
            "regularPrice": 120,
            "sales": 42
        },
        {
            "_id": "b",
            "name": "Mustard Oil",
            "description": "Cold pressed, 1 litre",
            "category": "Grocery",
            "image": "https://images.example.com/oil.jpg",
            "price": 50,
            "sales": 7
        },
        {
            "id": 3,
            "name": "Nakshi Kantha",
            "description": "Hand-stitched quilt",
            "category": "Crafts",
            "image": "https://images.example.com/kantha.jpg",
            "price": 1499.5,
            "sales": 1
        }
    ])
}

/// Receipt requests captured by the stub billing server.
#[derive(Debug, Clone, Default)]
pub struct ReceiptRequests {
    inner: Arc<Mutex<Vec<Value>>>,
}

impl ReceiptRequests {
    fn record(&self, body: Value) {
        self.inner
            .lock()
            .expect("receipt request log poisoned")
            .push(body);
    }

    /// All request bodies received so far.
    #[must_use]
    pub fn all(&self) -> Vec<Value> {
        self.inner
            .lock()
            .expect("receipt request log poisoned")
            .clone()
    }

    /// Number of receipt requests received so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.all().len()
    }
}

/// Running storefront plus stub billing server.
pub struct TestContext {
    /// Client with a cookie store; one visitor.
    pub client: Client,
    /// Base URL of the storefront, without trailing slash.
    pub storefront_url: String,
    /// Receipt requests seen by the stub billing server.
    pub receipts: ReceiptRequests,
}

impl TestContext {
    /// Start both servers with a healthy billing stub and local receipts.
    pub async fn new() -> Self {
        Self::with(ReceiptMode::Local, BillingBehavior::Healthy).await
    }

    /// Start both servers; waits until the catalog load has finished.
    pub async fn with(mode: ReceiptMode, behavior: BillingBehavior) -> Self {
        let receipts = ReceiptRequests::default();
        let billing_addr = spawn(billing_stub(behavior, receipts.clone())).await;

        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost".to_string(),
            billing: BillingConfig::new(&format!("http://{billing_addr}"))
                .expect("Invalid billing URL"),
            receipt_mode: mode,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config).expect("Failed to build application state");
        state
            .start_catalog_load()
            .await
            .expect("Catalog load task panicked");

        let storefront_addr = spawn(erashid_storefront::app(state)).await;

        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            storefront_url: format!("http://{storefront_addr}"),
            receipts,
        }
    }

    /// Absolute URL for `path` on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// POST an htmx-style form to the storefront.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("Request failed")
    }

    /// GET a storefront page and return its body.
    pub async fn get_text(&self, path: &str) -> String {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed")
            .text()
            .await
            .expect("Failed to read body")
    }
}

fn billing_stub(behavior: BillingBehavior, receipts: ReceiptRequests) -> Router {
    Router::new()
        .route(
            "/api/products",
            get(move || async move {
                if behavior == BillingBehavior::CatalogFails {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "down"})))
                } else {
                    (StatusCode::OK, Json(stub_catalog()))
                }
            }),
        )
        .route(
            "/api/generate-receipt",
            post(move |Json(body): Json<Value>| {
                let receipts = receipts.clone();
                async move {
                    receipts.record(body);
                    if behavior == BillingBehavior::ReceiptFails {
                        (StatusCode::INTERNAL_SERVER_ERROR, b"boom".to_vec())
                    } else {
                        (StatusCode::OK, STUB_RECEIPT_PDF.to_vec())
                    }
                }
            }),
        )
}

/// Serve `router` on an ephemeral port.
async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });
    addr
}
