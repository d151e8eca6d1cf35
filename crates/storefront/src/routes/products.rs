//! Product catalog handlers.
//!
//! Products come straight from the backend's public endpoints on every
//! request - no local copy, no cache.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use circuitfab_core::ProductId;

use crate::backend::types::Product;
use crate::filters;
use crate::routes::{ErrorTemplate, format_price};
use crate::state::AppState;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub price: String,
    /// Machine-readable price for add-to-cart forms.
    pub price_value: String,
    pub description: String,
    pub image: String,
    pub in_stock: bool,
    pub rating: f64,
    pub reviews_count: i64,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            category: product.category.clone().unwrap_or_default(),
            price: format_price(product.price),
            price_value: product.price.to_string(),
            description: product.description.clone(),
            image: product
                .images
                .first()
                .cloned()
                .unwrap_or_else(|| "/static/placeholder.png".to_string()),
            in_stock: product.in_stock,
            rating: product.rating,
            reviews_count: product.reviews_count,
        }
    }
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
}

/// Display the product listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Response {
    match state.backend().products().await {
        Ok(products) => ProductsIndexTemplate {
            products: products.iter().map(ProductView::from).collect(),
        }
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to load products");
            (
                StatusCode::BAD_GATEWAY,
                ErrorTemplate {
                    message: "Could not load the catalog right now.".to_string(),
                    retry_path: "/products".to_string(),
                },
            )
                .into_response()
        }
    }
}

/// Display a product detail page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let product_id = ProductId::new(id);

    match state.backend().product(&product_id).await {
        Ok(product) => ProductShowTemplate {
            product: ProductView::from(&product),
        }
        .into_response(),
        Err(e) if e.is_not_found() => (
            StatusCode::NOT_FOUND,
            ErrorTemplate {
                message: "That product does not exist.".to_string(),
                retry_path: "/products".to_string(),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, product_id = %product_id, "failed to load product");
            (
                StatusCode::BAD_GATEWAY,
                ErrorTemplate {
                    message: "Could not load this product right now.".to_string(),
                    retry_path: format!("/products/{product_id}"),
                },
            )
                .into_response()
        }
    }
}
