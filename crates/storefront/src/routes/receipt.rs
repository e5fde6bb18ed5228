//! Receipt route handlers.
//!
//! An empty cart or a failed download sends the visitor back to the
//! storefront with an alert instead of an error page: the receipt link is a
//! plain anchor, so there is no htmx target to swap an error into.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::cart::{CartStore, SessionStorage};
use crate::error::Result;
use crate::filters;
use crate::receipt::{self, RECEIPT_FILENAME, ReceiptError, ReceiptView};
use crate::routes::home::Notice;
use crate::state::AppState;

/// Receipt preview page template.
#[derive(Template, WebTemplate)]
#[template(path = "receipt/show.html")]
pub struct ReceiptShowTemplate {
    pub receipt: ReceiptView,
}

/// Preview the receipt for the current cart.
#[instrument(skip(store))]
pub async fn show(store: CartStore<SessionStorage>) -> Result<Response> {
    let cart = store.get().await;
    if cart.is_empty() {
        return Ok(Notice::EmptyCart.redirect().into_response());
    }

    Ok(ReceiptShowTemplate {
        receipt: ReceiptView::new(&cart, chrono::Local::now())?,
    }
    .into_response())
}

/// Download the receipt PDF for the current cart.
#[instrument(skip(state, store), fields(mode = %state.config().receipt_mode))]
pub async fn download(State(state): State<AppState>, store: CartStore<SessionStorage>) -> Response {
    let cart = store.get().await;

    let result = receipt::generate(
        state.config().receipt_mode,
        state.billing(),
        &cart,
        chrono::Local::now(),
    )
    .await;

    match result {
        Ok(pdf) => (
            [
                (CONTENT_TYPE, "application/pdf".to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{RECEIPT_FILENAME}\""),
                ),
            ],
            pdf,
        )
            .into_response(),
        Err(ReceiptError::EmptyCart) => Notice::EmptyCart.redirect().into_response(),
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(
                error = %e,
                sentry_event_id = %event_id,
                "Error generating PDF"
            );
            Notice::ReceiptFailed.redirect().into_response()
        }
    }
}
