//! End-to-end cart and catalog tests against the real storefront router.
//!
//! Run with: cargo test -p erashid-integration-tests

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use erashid_integration_tests::{BillingBehavior, TestContext};
use erashid_storefront::config::ReceiptMode;
use reqwest::StatusCode;

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_is_rendered_after_startup_fetch() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = ctx.get_text("/").await;
    assert!(body.contains("Darjeeling Tea"));
    assert!(body.contains("Mustard Oil"));
    assert!(body.contains("Nakshi Kantha"));
    // Discounted product shows its struck-through regular price
    assert!(body.contains("<s class=\"regular-price\">৳120.00</s>"));
    assert!(body.contains("৳1499.50"));
    assert!(body.contains("42 sold"));
}

#[tokio::test]
async fn test_catalog_failure_leaves_grid_empty() {
    let ctx = TestContext::with(ReceiptMode::Local, BillingBehavior::CatalogFails).await;

    let resp = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let resp = ctx.client.get(ctx.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(!body.contains("product-card"));
}

#[tokio::test]
async fn test_search_matches_name_description_and_category() {
    let ctx = TestContext::new().await;

    let search = |q: &'static str| {
        let ctx = &ctx;
        async move {
            let url = reqwest::Url::parse_with_params(&ctx.url("/search"), &[("q", q)]).unwrap();
            ctx.client
                .get(url)
                .header("HX-Request", "true")
                .send()
                .await
                .unwrap()
                .text()
                .await
                .unwrap()
        }
    };

    // Name, case-insensitive and trimmed
    let body = search("  darjeeling ").await;
    assert!(body.contains("Darjeeling Tea"));
    assert!(!body.contains("Mustard Oil"));

    // Description
    let body = search("cold pressed").await;
    assert!(body.contains("Mustard Oil"));
    assert!(!body.contains("Darjeeling Tea"));

    // Category
    let body = search("CRAFTS").await;
    assert!(body.contains("Nakshi Kantha"));

    // Empty query is the whole catalog
    let body = search("").await;
    assert_eq!(body.matches("product-card").count(), 3);

    // No match
    let body = search("bicycle").await;
    assert!(body.contains("No products found."));
    assert!(!body.contains("product-card"));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_twice_and_once_scenario() {
    let ctx = TestContext::new().await;

    for id in ["a", "a", "b"] {
        let resp = ctx.post_form("/cart/add", &[("id", id)]).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["hx-trigger"], "cart-updated");
    }

    let panel = ctx.get_text("/cart").await;
    assert_eq!(panel.matches("class=\"cart-line\"").count(), 2);
    assert!(panel.contains("id=\"cart-subtotal\">৳250.00</span>"));
    assert!(panel.contains("Items: 3"));

    let badge = ctx.get_text("/cart/count").await;
    assert!(badge.contains(">3</span>"));
}

#[tokio::test]
async fn test_numeric_product_id_can_be_added() {
    let ctx = TestContext::new().await;

    let resp = ctx.post_form("/cart/add", &[("id", "3")]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let panel = resp.text().await.unwrap();
    assert!(panel.contains("Nakshi Kantha"));
    assert!(panel.contains("৳1499.50"));
}

#[tokio::test]
async fn test_decrement_to_zero_removes_line() {
    let ctx = TestContext::new().await;
    ctx.post_form("/cart/add", &[("id", "b")]).await;

    let resp = ctx
        .post_form("/cart/update", &[("id", "b"), ("delta", "-1")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Your cart is empty."));
}

#[tokio::test]
async fn test_increment_and_remove() {
    let ctx = TestContext::new().await;
    ctx.post_form("/cart/add", &[("id", "a")]).await;
    ctx.post_form("/cart/add", &[("id", "b")]).await;

    let resp = ctx
        .post_form("/cart/update", &[("id", "a"), ("delta", "1")])
        .await;
    let panel = resp.text().await.unwrap();
    assert!(panel.contains("৳250.00"));

    let resp = ctx.post_form("/cart/remove", &[("id", "a")]).await;
    let panel = resp.text().await.unwrap();
    assert!(!panel.contains("Darjeeling Tea"));
    assert!(panel.contains("id=\"cart-subtotal\">৳50.00</span>"));
}

#[tokio::test]
async fn test_update_unknown_id_leaves_cart_unchanged() {
    let ctx = TestContext::new().await;
    ctx.post_form("/cart/add", &[("id", "a")]).await;

    let resp = ctx
        .post_form("/cart/update", &[("id", "zzz"), ("delta", "-1")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let panel = resp.text().await.unwrap();
    assert!(panel.contains("Darjeeling Tea"));
    assert!(panel.contains("Items: 1"));
}

#[tokio::test]
async fn test_unknown_product_cannot_be_added() {
    let ctx = TestContext::new().await;

    let resp = ctx.post_form("/cart/add", &[("id", "zzz")]).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let badge = ctx.get_text("/cart/count").await;
    assert!(badge.contains(">0</span>"));
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let ctx = TestContext::new().await;
    ctx.post_form("/cart/add", &[("id", "a")]).await;

    // A second visitor without the session cookie
    let stranger = reqwest::Client::new();
    let badge = stranger
        .get(ctx.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(badge.contains(">0</span>"));
}
