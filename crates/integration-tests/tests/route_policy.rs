//! Request-time guard behavior over real HTTP.

#![allow(clippy::unwrap_used)]

use circuitfab_integration_tests::{TestContext, location};

#[tokio::test]
async fn anonymous_protected_path_redirects_to_login_with_hint() {
    let ctx = TestContext::new().await;

    let response = ctx.client.get(ctx.url("/dashboard")).send().await.unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login?redirect=%2Fdashboard");
}

#[tokio::test]
async fn redirect_hint_carries_nested_paths() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(ctx.url("/products/p-100"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login?redirect=%2Fproducts%2Fp-100");
}

#[tokio::test]
async fn anonymous_public_and_collection_paths_are_open() {
    let ctx = TestContext::new().await;

    for path in ["/", "/login", "/register", "/cart", "/wishlist", "/health"] {
        let response = ctx.client.get(ctx.url(path)).send().await.unwrap();
        assert_eq!(response.status(), 200, "expected 200 for {path}");
    }
}

#[tokio::test]
async fn authenticated_login_page_redirects_to_dashboard() {
    let ctx = TestContext::new().await;
    ctx.stub.seed_customer("u-alice", "alice@acme.io", "Alice Chen", 0);
    ctx.login("alice@acme.io", "customerpass1").await;

    for path in ["/login", "/register"] {
        let response = ctx.client.get(ctx.url(path)).send().await.unwrap();
        assert!(response.status().is_redirection(), "expected redirect for {path}");
        assert_eq!(location(&response), "/dashboard");
    }
}

#[tokio::test]
async fn customer_is_bounced_from_admin_to_dashboard() {
    let ctx = TestContext::new().await;
    ctx.stub.seed_customer("u-alice", "alice@acme.io", "Alice Chen", 0);
    ctx.login("alice@acme.io", "customerpass1").await;

    let response = ctx
        .client
        .get(ctx.url("/admin/customers"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn anonymous_admin_path_redirects_to_login() {
    let ctx = TestContext::new().await;

    let response = ctx.client.get(ctx.url("/admin")).send().await.unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login?redirect=%2Fadmin");
}

#[tokio::test]
async fn admin_reaches_the_back_office() {
    let ctx = TestContext::new().await;
    ctx.stub.seed_admin();
    ctx.login("admin@circuitfab.io", "adminpass123").await;

    let response = ctx.client.get(ctx.url("/admin")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("Customer funnel"));
}
