//! Cart persistence.
//!
//! The whole cart lives under a single key (`cart`) of a per-visitor
//! key-value store, as a JSON array. Every operation loads the full array,
//! mutates it, and writes the full array back; there is no diffing and no
//! locking, so two tabs sharing a session can overwrite each other
//! (last writer wins).
//!
//! Reads fail open: an absent, unreadable or corrupt value is an empty cart.

mod memory;
mod session;

use std::future::Future;

use erashid_core::{Cart, ProductId, ProductSummary};
use thiserror::Error;
use tracing::instrument;

pub use memory::MemoryStorage;
pub use session::SessionStorage;

/// Persistent key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Errors from the underlying key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Session backend failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string key-value store scoped to one visitor.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    fn get_item(&self, key: &str)
    -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Overwrite the value stored under `key`.
    fn set_item(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Load-mutate-save cart operations over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    storage: S,
}

impl<S: KeyValueStore> CartStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the cart.
    ///
    /// Absent, unreadable or unparsable values yield an empty cart.
    pub async fn get(&self) -> Cart {
        let raw = match self.storage.get_item(CART_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart, treating as empty");
                return Cart::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding unparsable cart");
            Cart::new()
        })
    }

    /// Persist the full cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized or written.
    pub async fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart)?;
        self.storage.set_item(CART_KEY, raw).await
    }

    /// Add one unit of `product`, returning the saved cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add(&self, product: ProductSummary) -> Result<Cart, StorageError> {
        let mut cart = self.get().await;
        cart.add(product);
        self.save(&cart).await?;
        Ok(cart)
    }

    /// Change a line's quantity by `delta`, returning the saved cart.
    ///
    /// Lines dropping to zero or below are removed; unknown ids leave the
    /// contents unchanged (the cart is still written back).
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_quantity(&self, id: &ProductId, delta: i64) -> Result<Cart, StorageError> {
        let mut cart = self.get().await;
        if !cart.update_quantity(id, delta) {
            tracing::debug!("Quantity update for product not in cart");
        }
        self.save(&cart).await?;
        Ok(cart)
    }

    /// Remove a product's line, returning the saved cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove(&self, id: &ProductId) -> Result<Cart, StorageError> {
        let mut cart = self.get().await;
        cart.remove(id);
        self.save(&cart).await?;
        Ok(cart)
    }
}
