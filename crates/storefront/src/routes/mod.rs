//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Storefront (search, product grid, cart panel)
//! GET  /search?q=              - Product grid fragment (HTMX) or full page
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add to cart (returns cart panel, triggers cart-updated)
//! POST /cart/update            - Change quantity by delta (returns cart panel)
//! POST /cart/remove            - Remove line (returns cart panel)
//!
//! # Receipt
//! GET  /receipt                - Receipt preview
//! GET  /receipt/download       - Receipt PDF attachment
//! ```

pub mod cart;
pub mod home;
pub mod products;
pub mod receipt;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the receipt routes router.
pub fn receipt_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(receipt::show))
        .route("/download", get(receipt::download))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/search", get(products::search))
        .nest("/cart", cart_routes())
        .nest("/receipt", receipt_routes())
}
