//! Catalog pages proxied from the backend's public endpoints.

#![allow(clippy::unwrap_used)]

use circuitfab_integration_tests::TestContext;

async fn logged_in_context() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.stub.seed_customer("u-alice", "alice@acme.io", "Alice Chen", 0);
    ctx.login("alice@acme.io", "customerpass1").await;
    ctx
}

#[tokio::test]
async fn catalog_renders_backend_products() {
    let ctx = logged_in_context().await;

    let body = ctx
        .client
        .get(ctx.url("/products"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("4-layer prototype board"));
    assert!(body.contains("$129.50"));
    assert!(body.contains("Stainless stencil"));
    // The stencil is out of stock, so its card carries no add-to-cart form.
    assert!(body.contains("Out of stock"));
}

#[tokio::test]
async fn product_detail_renders() {
    let ctx = logged_in_context().await;

    let body = ctx
        .client
        .get(ctx.url("/products/p-100"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("4-layer prototype board"));
    assert!(body.contains("ENIG finish"));
    assert!(body.contains("12 reviews"));
}

#[tokio::test]
async fn unknown_product_is_a_not_found_page() {
    let ctx = logged_in_context().await;

    let response = ctx
        .client
        .get(ctx.url("/products/p-404"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body = response.text().await.unwrap();
    assert!(body.contains("does not exist"));
}
