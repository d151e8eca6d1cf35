//! Login, registration, fail-closed clearing, and logout over real HTTP.

#![allow(clippy::unwrap_used)]

use circuitfab_integration_tests::{TestContext, location};

#[tokio::test]
async fn login_establishes_a_session() {
    let ctx = TestContext::new().await;
    ctx.stub.seed_customer("u-alice", "alice@acme.io", "Alice Chen", 1);

    ctx.login("alice@acme.io", "customerpass1").await;

    let response = ctx.client.get(ctx.url("/dashboard")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("Alice Chen"));
    assert!(body.contains("alice@acme.io"));
}

#[tokio::test]
async fn register_establishes_a_session() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .post(ctx.url("/register"))
        .form(&[
            ("full_name", "Bob Ray"),
            ("email", "bob@example.com"),
            ("password", "hunter22abc"),
            ("company", "Example Corp"),
            ("phone", ""),
        ])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/dashboard");

    let body = ctx
        .client
        .get(ctx.url("/dashboard"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Bob Ray"));
    assert!(body.contains("Example Corp"));
}

#[tokio::test]
async fn failed_login_stores_nothing() {
    let ctx = TestContext::new().await;
    ctx.stub.seed_customer("u-alice", "alice@acme.io", "Alice Chen", 0);

    let response = ctx
        .client
        .post(ctx.url("/login"))
        .form(&[("email", "alice@acme.io"), ("password", "wrong")])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    let target = location(&response);
    assert!(
        target.starts_with("/login?error="),
        "unexpected redirect: {target}"
    );
    // The backend's message rides along for the login page to render.
    assert!(target.contains("Incorrect"));

    // Still anonymous: the guard bounces the protected page.
    let response = ctx.client.get(ctx.url("/dashboard")).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login?redirect=%2Fdashboard");
}

#[tokio::test]
async fn duplicate_registration_surfaces_backend_message() {
    let ctx = TestContext::new().await;
    ctx.stub.seed_customer("u-alice", "alice@acme.io", "Alice Chen", 0);

    let response = ctx
        .client
        .post(ctx.url("/register"))
        .form(&[
            ("full_name", "Alice Again"),
            ("email", "alice@acme.io"),
            ("password", "hunter22abc"),
        ])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert!(location(&response).contains("already%20registered"));
}

#[tokio::test]
async fn rejected_token_clears_the_session_fail_closed() {
    let ctx = TestContext::new().await;
    ctx.stub.seed_customer("u-alice", "alice@acme.io", "Alice Chen", 0);
    ctx.login("alice@acme.io", "customerpass1").await;

    // The backend forgets every token: the next authoritative fetch fails.
    ctx.stub.revoke_all_tokens();

    let response = ctx.client.get(ctx.url("/dashboard")).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    // The session was cleared, not just the one response: the login page is
    // reachable again (an authenticated client would be bounced away).
    let response = ctx.client.get(ctx.url("/login")).send().await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn logout_clears_everything_and_goes_home() {
    let ctx = TestContext::new().await;
    ctx.stub.seed_customer("u-alice", "alice@acme.io", "Alice Chen", 0);
    ctx.login("alice@acme.io", "customerpass1").await;

    let response = ctx.client.post(ctx.url("/logout")).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    let response = ctx.client.get(ctx.url("/dashboard")).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login?redirect=%2Fdashboard");
}

#[tokio::test]
async fn session_status_poll_tears_down_rejected_tokens() {
    let ctx = TestContext::new().await;
    ctx.stub.seed_customer("u-alice", "alice@acme.io", "Alice Chen", 0);
    ctx.login("alice@acme.io", "customerpass1").await;

    ctx.stub.revoke_all_tokens();

    let response = ctx
        .client
        .get(ctx.url("/session/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("hx-redirect")
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );

    // The poll cleared the session: protected pages bounce to login again.
    let response = ctx.client.get(ctx.url("/dashboard")).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login?redirect=%2Fdashboard");
}

#[tokio::test]
async fn session_status_is_empty_for_fresh_sessions() {
    let ctx = TestContext::new().await;
    ctx.stub.seed_customer("u-alice", "alice@acme.io", "Alice Chen", 0);
    ctx.login("alice@acme.io", "customerpass1").await;

    let body = ctx
        .client
        .get(ctx.url("/session/status"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.trim().is_empty());
}
