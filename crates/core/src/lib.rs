//! e-Rashid Core - Shared domain types.
//!
//! This crate provides the types used across the e-Rashid components:
//! - `storefront` - Catalog, cart and receipt web binary
//! - `integration-tests` - End-to-end tests against the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no session access. Cart mutations and catalog search live here so
//! they can be tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, products, cart lines and the cart itself
//! - [`catalog`] - The in-memory product catalog and its search

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use catalog::Catalog;
pub use types::*;
