//! Admin customer screens: list, filter, and the single-field status action.

#![allow(clippy::unwrap_used)]

use circuitfab_integration_tests::TestContext;

async fn admin_context() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.stub.seed_admin();
    ctx.stub
        .seed_customer("u-alice", "alice@acme.io", "Alice Chen", 1);
    ctx.stub
        .seed_customer("u-bob", "bob@example.com", "Bob Ray", 0);
    ctx.login("admin@circuitfab.io", "adminpass123").await;
    ctx
}

#[tokio::test]
async fn list_shows_only_the_requested_stage() {
    let ctx = admin_context().await;

    let body = ctx
        .client
        .get(ctx.url("/admin/customers?status=1"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Alice Chen"));
    assert!(!body.contains("Bob Ray"));
}

#[tokio::test]
async fn search_filters_without_mutating_the_loaded_list() {
    let ctx = admin_context().await;

    let rows = ctx
        .client
        .get(ctx.url("/admin/customers/rows?status=1&q=zzz"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!rows.contains("Alice Chen"));
    assert!(rows.contains("No customers match"));

    // A fresh query without the filter still sees the full list.
    let rows = ctx
        .client
        .get(ctx.url("/admin/customers/rows?status=1"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(rows.contains("Alice Chen"));
}

#[tokio::test]
async fn search_matches_company_case_insensitively() {
    let ctx = admin_context().await;
    ctx.stub.add_user(circuitfab_integration_tests::StubUser {
        id: "u-carol".to_string(),
        email: "carol@widgets.io".to_string(),
        password: "customerpass1".to_string(),
        full_name: "Carol Diaz".to_string(),
        company: Some("Widget Works".to_string()),
        phone: None,
        role: "customer".to_string(),
        fabrication_status: 1,
    });

    let rows = ctx
        .client
        .get(ctx.url("/admin/customers/rows?status=1&q=WIDGET"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(rows.contains("Carol Diaz"));
    assert!(!rows.contains("Alice Chen"));
}

#[tokio::test]
async fn status_update_reloads_the_list() {
    let ctx = admin_context().await;

    let response = ctx
        .client
        .post(ctx.url("/admin/customers/status"))
        .form(&[
            ("user_id", "u-alice"),
            ("status", "2"),
            ("view_status", "1"),
            ("q", ""),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let rows = response.text().await.unwrap();

    // Alice advanced out of the viewed stage, so the reloaded rows lose her.
    assert!(!rows.contains("Alice Chen"));
    assert_eq!(ctx.stub.user_status("u-alice"), Some(2));
}

#[tokio::test]
async fn failed_update_returns_non_2xx_and_changes_nothing() {
    let ctx = admin_context().await;
    ctx.stub.set_fail_status_updates(true);

    let response = ctx
        .client
        .post(ctx.url("/admin/customers/status"))
        .form(&[
            ("user_id", "u-alice"),
            ("status", "2"),
            ("view_status", "1"),
            ("q", ""),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    assert_eq!(ctx.stub.user_status("u-alice"), Some(1));

    // The list itself is untouched.
    let rows = ctx
        .client
        .get(ctx.url("/admin/customers/rows?status=1"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(rows.contains("Alice Chen"));
}

#[tokio::test]
async fn overview_counts_customers_per_stage() {
    let ctx = admin_context().await;

    let body = ctx
        .client
        .get(ctx.url("/admin"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Customer funnel"));
    assert!(body.contains("New"));
    assert!(body.contains("Visited"));
    assert!(body.contains("In Cart"));
}

#[tokio::test]
async fn invalid_status_value_is_a_bad_request() {
    let ctx = admin_context().await;

    let response = ctx
        .client
        .get(ctx.url("/admin/customers?status=9"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}
