//! Application state shared across handlers.

use std::sync::Arc;

use erashid_core::Catalog;

use crate::billing::{BillingClient, BillingError};
use crate::catalog::CatalogHandle;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the billing client and the loaded catalog.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    billing: BillingClient,
    catalog: CatalogHandle,
}

impl AppState {
    /// Create a new application state with an empty, not-yet-loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the billing HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, BillingError> {
        let billing = BillingClient::new(&config.billing)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                billing,
                catalog: CatalogHandle::new(),
            }),
        })
    }

    /// Create application state with a catalog already in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the billing HTTP client cannot be built.
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Result<Self, BillingError> {
        let state = Self::new(config)?;
        state.inner.catalog.publish(catalog);
        Ok(state)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the billing server client.
    #[must_use]
    pub fn billing(&self) -> &BillingClient {
        &self.inner.billing
    }

    /// Get a reference to the catalog handle.
    #[must_use]
    pub fn catalog(&self) -> &CatalogHandle {
        &self.inner.catalog
    }

    /// Start loading the catalog in the background.
    pub fn start_catalog_load(&self) -> tokio::task::JoinHandle<()> {
        self.inner.catalog.spawn_load(self.inner.billing.clone())
    }
}
