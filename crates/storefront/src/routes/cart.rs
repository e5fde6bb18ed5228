//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation returns the re-rendered cart panel and fires `cart-updated`
//! so the count badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use erashid_core::{Cart, CartLine, PriceError, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::cart::{CartStore, SessionStorage};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Event name htmx listens for to refresh cart-dependent elements.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl TryFrom<&CartLine> for CartLineView {
    type Error = PriceError;

    fn try_from(line: &CartLine) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            description: line.description.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            price: line.price.to_string(),
            line_price: line.line_total()?.to_string(),
        })
    }
}

impl TryFrom<&Cart> for CartView {
    type Error = PriceError;

    fn try_from(cart: &Cart) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            items: cart
                .lines()
                .iter()
                .map(CartLineView::try_from)
                .collect::<std::result::Result<_, _>>()?,
            subtotal: cart.subtotal()?.to_string(),
            item_count: cart.item_count(),
        })
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn parse_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Cart panel plus the `HX-Trigger` that refreshes the badge.
fn updated(cart: &Cart) -> Result<Response> {
    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartItemsTemplate {
            cart: CartView::try_from(cart)?,
        },
    )
        .into_response())
}

/// Display the cart panel.
#[instrument(skip(store))]
pub async fn show(store: CartStore<SessionStorage>) -> Result<impl IntoResponse> {
    let cart = store.get().await;
    Ok(CartItemsTemplate {
        cart: CartView::try_from(&cart)?,
    })
}

/// Get cart count badge (HTMX).
#[instrument(skip(store))]
pub async fn count(store: CartStore<SessionStorage>) -> impl IntoResponse {
    CartCountTemplate {
        count: store.get().await.item_count(),
    }
}

/// Add one unit of a catalog product to the cart (HTMX).
#[instrument(skip(state, store))]
pub async fn add(
    State(state): State<AppState>,
    store: CartStore<SessionStorage>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = parse_id(&form.id)?;
    let summary = state
        .catalog()
        .current()
        .find(&id)
        .map(erashid_core::Product::summary)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
    let cart = store.add(summary).await?;
    updated(&cart)
}

/// Change a line's quantity by `delta` (HTMX).
#[instrument(skip(store))]
pub async fn update(
    store: CartStore<SessionStorage>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = parse_id(&form.id)?;
    let cart = store.update_quantity(&id, form.delta).await?;
    updated(&cart)
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(store))]
pub async fn remove(
    store: CartStore<SessionStorage>,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = parse_id(&form.id)?;
    add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id.as_str())]));
    let cart = store.remove(&id).await?;
    updated(&cart)
}
