//! Product search route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use erashid_core::Product;
use serde::Deserialize;
use tracing::instrument;

use crate::cart::{CartStore, SessionStorage};
use crate::error::Result;
use crate::routes::cart::CartView;
use crate::routes::home::HomeTemplate;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate<'a> {
    pub products: Vec<&'a Product>,
    pub catalog_ready: bool,
}

/// Whether the request was issued by htmx rather than a plain form submit.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Filter the catalog by name, description or category.
///
/// HTMX requests get the product grid fragment; anything else gets the full
/// storefront with the query kept in the search box.
#[instrument(skip(state, store, headers))]
pub async fn search(
    State(state): State<AppState>,
    store: CartStore<SessionStorage>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let catalog = state.catalog().current();
    let products = catalog.search(&query.q);
    let catalog_ready = state.catalog().is_loaded();

    tracing::debug!(results = products.len(), "Catalog searched");

    if is_htmx(&headers) {
        return Ok(ProductGridTemplate {
            products,
            catalog_ready,
        }
        .into_response());
    }

    let cart = store.get().await;
    Ok(HomeTemplate {
        products,
        query: query.q.trim().to_string(),
        catalog_ready,
        cart: CartView::try_from(&cart)?,
        notice: None,
    }
    .into_response())
}
