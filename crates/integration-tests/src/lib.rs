//! Integration tests for CircuitFab.
//!
//! The harness runs the real storefront router against a stub backend, both
//! on ephemeral local ports, and drives them with a cookie-keeping HTTP
//! client. No mocking inside the storefront: every test exercises the same
//! code paths production traffic takes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p circuitfab-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};

use circuitfab_storefront::config::{BackendConfig, SessionPolicy, StorefrontConfig};
use circuitfab_storefront::state::AppState;

// =============================================================================
// Stub backend
// =============================================================================

/// A user record held by the stub backend.
#[derive(Debug, Clone)]
pub struct StubUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub fabrication_status: u8,
}

#[derive(Default)]
struct StubInner {
    users: Vec<StubUser>,
    /// token -> user id
    tokens: HashMap<String, String>,
    token_counter: u32,
    fail_status_updates: bool,
}

/// In-memory stand-in for the CircuitFab backend API.
///
/// Implements the endpoints the storefront consumes, with the same JSON
/// shapes and `detail`-style error bodies.
#[derive(Clone, Default)]
pub struct StubBackend {
    inner: Arc<Mutex<StubInner>>,
}

impl StubBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user record.
    pub fn add_user(&self, user: StubUser) {
        self.inner.lock().unwrap().users.push(user);
    }

    /// Seed a customer with sensible defaults.
    pub fn seed_customer(&self, id: &str, email: &str, name: &str, status: u8) {
        self.add_user(StubUser {
            id: id.to_string(),
            email: email.to_string(),
            password: "customerpass1".to_string(),
            full_name: name.to_string(),
            company: None,
            phone: None,
            role: "customer".to_string(),
            fabrication_status: status,
        });
    }

    /// Seed the standard admin account used by the admin tests.
    pub fn seed_admin(&self) {
        self.add_user(StubUser {
            id: "u-admin".to_string(),
            email: "admin@circuitfab.io".to_string(),
            password: "adminpass123".to_string(),
            full_name: "Ada Admin".to_string(),
            company: None,
            phone: None,
            role: "admin".to_string(),
            fabrication_status: 0,
        });
    }

    /// Invalidate every issued token (as if the backend rotated secrets).
    pub fn revoke_all_tokens(&self) {
        self.inner.lock().unwrap().tokens.clear();
    }

    /// Make `PUT /auth/fabrication-status` fail with a 500.
    pub fn set_fail_status_updates(&self, fail: bool) {
        self.inner.lock().unwrap().fail_status_updates = fail;
    }

    /// Current fabrication status of a user, if the user exists.
    #[must_use]
    pub fn user_status(&self, id: &str) -> Option<u8> {
        self.inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.fabrication_status)
    }

    fn issue_token(&self, user_id: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.token_counter += 1;
        let token = format!("tok-{}", inner.token_counter);
        inner.tokens.insert(token.clone(), user_id.to_string());
        token
    }

    fn user_for_token(&self, headers: &HeaderMap) -> Option<StubUser> {
        let token = bearer_token(headers)?;
        let inner = self.inner.lock().unwrap();
        let user_id = inner.tokens.get(&token)?;
        inner.users.iter().find(|u| &u.id == user_id).cloned()
    }

    /// Build the stub's axum router.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/me", get(me))
            .route("/auth/verify", get(verify))
            .route("/auth/fabrication-status", put(update_status))
            .route("/auth/users-by-fabrication-status", get(users_by_status))
            .route("/public/products", get(products))
            .route("/public/products/{id}", get(product))
            .with_state(self.clone())
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(String::from)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn user_json(user: &StubUser) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "full_name": user.full_name,
        "company": user.company,
        "phone": user.phone,
        "role": user.role,
        "is_active": true,
        "fabrication_status": user.fabrication_status,
    })
}

async fn login(State(stub): State<StubBackend>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    let user = {
        let inner = stub.inner.lock().unwrap();
        inner
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned()
    };

    match user {
        Some(user) => {
            let token = stub.issue_token(&user.id);
            Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
        }
        None => detail(StatusCode::UNAUTHORIZED, "Incorrect email or password"),
    }
}

async fn register(State(stub): State<StubBackend>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();

    let duplicate = {
        let inner = stub.inner.lock().unwrap();
        inner.users.iter().any(|u| u.email == email)
    };
    if duplicate {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }

    let user = StubUser {
        id: format!("u-{}", email.replace(['@', '.'], "-")),
        email,
        password: body["password"].as_str().unwrap_or_default().to_string(),
        full_name: body["full_name"].as_str().unwrap_or_default().to_string(),
        company: body["company"].as_str().map(String::from),
        phone: body["phone"].as_str().map(String::from),
        role: "customer".to_string(),
        fabrication_status: 0,
    };
    stub.add_user(user.clone());

    let token = stub.issue_token(&user.id);
    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

async fn me(State(stub): State<StubBackend>, headers: HeaderMap) -> Response {
    match stub.user_for_token(&headers) {
        Some(user) => Json(user_json(&user)).into_response(),
        None => detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"),
    }
}

async fn verify(State(stub): State<StubBackend>, headers: HeaderMap) -> Response {
    match stub.user_for_token(&headers) {
        Some(_) => Json(json!({ "status": "valid" })).into_response(),
        None => detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"),
    }
}

async fn update_status(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(caller) = stub.user_for_token(&headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    };
    if caller.role != "admin" {
        return detail(StatusCode::FORBIDDEN, "Admin access required");
    }

    let fail = stub.inner.lock().unwrap().fail_status_updates;
    if fail {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Update failed");
    }

    let user_id = body["user_id"].as_str().unwrap_or_default().to_string();
    let status = u8::try_from(body["status"].as_u64().unwrap_or(0)).unwrap_or(0);

    let mut inner = stub.inner.lock().unwrap();
    match inner.users.iter_mut().find(|u| u.id == user_id) {
        Some(user) => {
            user.fabrication_status = status;
            drop(inner);
            Json(json!({ "message": "Fabrication status updated" })).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn users_by_status(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(caller) = stub.user_for_token(&headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    };
    if caller.role != "admin" {
        return detail(StatusCode::FORBIDDEN, "Admin access required");
    }

    let status: u8 = params
        .get("status")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let inner = stub.inner.lock().unwrap();
    let users: Vec<Value> = inner
        .users
        .iter()
        .filter(|u| u.fabrication_status == status && u.role == "customer")
        .map(user_json)
        .collect();

    Json(json!({ "users": users })).into_response()
}

async fn products(State(_stub): State<StubBackend>) -> Response {
    Json(json!({ "products": [
        {
            "id": "p-100",
            "name": "4-layer prototype board",
            "sku": "PCB-4L",
            "category": "Fabrication",
            "price": 129.5,
            "description": "Four layer FR-4, ENIG finish, 5 day turn.",
            "images": ["/img/pcb-4l.png"],
            "in_stock": true,
            "stock_quantity": 25,
            "rating": 4.5,
            "reviews_count": 12
        },
        {
            "id": "p-200",
            "name": "Stainless stencil",
            "sku": "STN-01",
            "category": "Assembly",
            "price": 24.0,
            "description": "Framed stainless steel stencil.",
            "images": [],
            "in_stock": false,
            "stock_quantity": 0,
            "rating": 0.0,
            "reviews_count": 0
        }
    ]}))
    .into_response()
}

async fn product(State(_stub): State<StubBackend>, Path(id): Path<String>) -> Response {
    if id == "p-100" {
        Json(json!({
            "id": "p-100",
            "name": "4-layer prototype board",
            "sku": "PCB-4L",
            "category": "Fabrication",
            "price": 129.5,
            "description": "Four layer FR-4, ENIG finish, 5 day turn.",
            "images": ["/img/pcb-4l.png"],
            "in_stock": true,
            "stock_quantity": 25,
            "rating": 4.5,
            "reviews_count": 12
        }))
        .into_response()
    } else {
        detail(StatusCode::NOT_FOUND, "Product not found")
    }
}

// =============================================================================
// Test harness
// =============================================================================

/// Serve a router on an ephemeral local port.
async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A running storefront + stub backend pair and a client that keeps cookies.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub stub: StubBackend,
}

impl TestContext {
    /// Spin up a stub backend and a storefront wired to it.
    ///
    /// Redirects are NOT followed so tests can observe guard behavior.
    pub async fn new() -> Self {
        Self::with_policy(SessionPolicy::default()).await
    }

    /// Same, with an explicit session policy.
    pub async fn with_policy(session: SessionPolicy) -> Self {
        let stub = StubBackend::new();
        let backend_addr = spawn(stub.router()).await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            backend: BackendConfig {
                base_url: format!("http://{backend_addr}"),
            },
            session,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let storefront_addr = spawn(circuitfab_storefront::app(AppState::new(config))).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            client,
            base_url: format!("http://{storefront_addr}"),
            stub,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log in through the real login route; panics if the redirect to the
    /// dashboard does not happen.
    pub async fn login(&self, email: &str, password: &str) {
        let response = self
            .client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .unwrap();

        assert!(
            response.status().is_redirection(),
            "login did not redirect: {}",
            response.status()
        );
        assert_eq!(location(&response), "/dashboard");
    }
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
