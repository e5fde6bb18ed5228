//! Storefront page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use erashid_core::Product;
use serde::Deserialize;
use tracing::instrument;

use crate::cart::{CartStore, SessionStorage};
use crate::error::Result;
use crate::filters;
use crate::receipt::{DOWNLOAD_FAILED_MESSAGE, ReceiptError};
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Alert shown at the top of the storefront after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EmptyCart,
    ReceiptFailed,
}

impl Notice {
    /// Query-string value carrying this notice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyCart => "empty-cart",
            Self::ReceiptFailed => "receipt-failed",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "empty-cart" => Some(Self::EmptyCart),
            "receipt-failed" => Some(Self::ReceiptFailed),
            _ => None,
        }
    }

    /// Text of the alert.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::EmptyCart => ReceiptError::EmptyCart.to_string(),
            Self::ReceiptFailed => DOWNLOAD_FAILED_MESSAGE.to_string(),
        }
    }

    /// Send the visitor back to the storefront with this alert.
    #[must_use]
    pub fn redirect(self) -> Redirect {
        Redirect::to(&format!("/?notice={}", self.as_str()))
    }
}

/// Storefront query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub notice: String,
}

/// Full storefront page: search form, product grid and cart panel.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate<'a> {
    pub products: Vec<&'a Product>,
    pub query: String,
    pub catalog_ready: bool,
    pub cart: CartView,
    pub notice: Option<Notice>,
}

/// Display the storefront.
#[instrument(skip(state, store))]
pub async fn home(
    State(state): State<AppState>,
    store: CartStore<SessionStorage>,
    Query(query): Query<HomeQuery>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog().current();
    let cart = store.get().await;

    Ok(HomeTemplate {
        products: catalog.products().iter().collect(),
        query: String::new(),
        catalog_ready: state.catalog().is_loaded(),
        cart: CartView::try_from(&cart)?,
        notice: Notice::parse(&query.notice),
    }
    .into_response())
}
