//! In-memory catalog loaded from the billing server.
//!
//! The catalog is fetched once, in the background, right after startup. Until
//! it arrives (or if the fetch fails) the storefront serves an empty product
//! grid. Failures are logged and not retried.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use erashid_core::Catalog;

use crate::billing::{BillingClient, BillingError};

/// Shared, swappable handle to the current catalog.
#[derive(Clone, Default)]
pub struct CatalogHandle {
    inner: Arc<CatalogHandleInner>,
}

#[derive(Default)]
struct CatalogHandleInner {
    catalog: RwLock<Arc<Catalog>>,
    loaded: AtomicBool,
}

impl CatalogHandle {
    /// An empty, not-yet-loaded catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current catalog.
    #[must_use]
    pub fn current(&self) -> Arc<Catalog> {
        self.inner
            .catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a catalog fetch has completed successfully.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.load(Ordering::Acquire)
    }

    /// Replace the catalog and mark it loaded.
    pub fn publish(&self, catalog: Catalog) {
        *self
            .inner
            .catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
        self.inner.loaded.store(true, Ordering::Release);
    }

    /// Fetch the catalog from the billing server and publish it.
    ///
    /// # Errors
    ///
    /// Returns the billing error; the previously published catalog (empty on
    /// first load) stays in place.
    pub async fn load(&self, billing: &BillingClient) -> Result<usize, BillingError> {
        let products = billing.fetch_products().await?;
        let count = products.len();
        self.publish(Catalog::new(products));
        Ok(count)
    }

    /// Spawn the startup fetch in the background.
    ///
    /// Errors are logged only; the product grid stays empty.
    pub fn spawn_load(&self, billing: BillingClient) -> tokio::task::JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            match handle.load(&billing).await {
                Ok(count) => tracing::info!(products = count, "Catalog loaded"),
                Err(e) => tracing::error!(error = %e, "Error loading products"),
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use erashid_core::{Price, Product, ProductId};
    use tokio::net::TcpListener;

    use super::*;
    use crate::config::BillingConfig;

    async fn billing_for(router: Router) -> BillingClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        BillingClient::new(&BillingConfig::new(&format!("http://{addr}")).unwrap()).unwrap()
    }

    #[test]
    fn test_new_handle_is_empty_and_not_loaded() {
        let handle = CatalogHandle::new();
        assert!(!handle.is_loaded());
        assert!(handle.current().is_empty());
    }

    #[test]
    fn test_publish_marks_loaded() {
        let handle = CatalogHandle::new();
        handle.publish(Catalog::new(vec![Product {
            id: ProductId::new("a"),
            name: "Tea".to_string(),
            description: String::new(),
            category: String::new(),
            image: String::new(),
            price: Price::from(100),
            regular_price: None,
            sales: 0,
        }]));
        assert!(handle.is_loaded());
        assert_eq!(handle.current().len(), 1);
    }

    #[tokio::test]
    async fn test_load_publishes_products() {
        let billing = billing_for(Router::new().route(
            "/api/products",
            get(|| async { r#"[{"_id":"a","name":"Tea","price":100}]"# }),
        ))
        .await;
        let handle = CatalogHandle::new();

        let count = handle.load(&billing).await.unwrap();
        assert_eq!(count, 1);
        assert!(handle.is_loaded());
        assert!(handle.current().find(&ProductId::new("a")).is_some());
    }

    #[tokio::test]
    async fn test_failed_spawned_load_leaves_catalog_empty() {
        let billing = billing_for(Router::new().route(
            "/api/products",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;
        let handle = CatalogHandle::new();

        handle.spawn_load(billing).await.unwrap();
        assert!(!handle.is_loaded());
        assert!(handle.current().is_empty());
    }
}
