//! Core types for e-Rashid.
//!
//! This module provides type-safe wrappers for the storefront's domain
//! concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartLine};
pub use id::{IdError, ProductId};
pub use price::{CURRENCY_SYMBOL, Price, PriceError};
pub use product::{Product, ProductSummary};
