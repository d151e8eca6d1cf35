//! Wire types for the backend API.
//!
//! These mirror the backend's JSON shapes. Optional fields are modeled as
//! explicit `Option<T>`; prices travel as JSON floats and are parsed into
//! `Decimal` at the boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use circuitfab_core::{Email, FabricationStatus, ProductId, UserId, UserRole};

/// Token issued by `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer token.
    pub access_token: String,
    /// Token type reported by the backend (always "bearer" in practice).
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Authoritative user record as returned by `GET /auth/me` and the admin
/// list endpoint.
///
/// The storefront only ever caches this record; the backend owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendUser {
    pub id: UserId,
    pub email: Email,
    pub full_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub fabrication_status: FabricationStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Registration payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Login payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Single-field update payload for `PUT /auth/fabrication-status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricationStatusUpdate {
    pub user_id: UserId,
    pub status: FabricationStatus,
}

/// Envelope for `GET /auth/users-by-fabrication-status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersEnvelope {
    #[serde(default)]
    pub users: Vec<BackendUser>,
}

/// Envelope for `GET /public/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsEnvelope {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Catalog product as returned by the public endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: i64,
}

const fn default_true() -> bool {
    true
}
