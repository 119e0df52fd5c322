//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - JSON API driven through the router with `oneshot`
//! - `cart_persistence` - Cart state surviving store restarts on real storage
//!
//! Everything runs in-process: the bundled catalog with no latency, an
//! instant checkout and in-memory cart storage unless a test supplies its own.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use shopfront_storefront::cart::{CartStore, MemoryStorage, Storage};
use shopfront_storefront::catalog::{Catalog, Latency, Product};
use shopfront_storefront::checkout::CheckoutService;
use shopfront_storefront::routes;
use shopfront_storefront::state::AppState;
use tower::ServiceExt;

/// The catalog shipped with the storefront crate.
pub const BUNDLED_CATALOG: &str = include_str!("../../storefront/data/products.json");

/// Parse [`BUNDLED_CATALOG`].
///
/// # Panics
///
/// Panics if the bundled catalog is malformed.
#[must_use]
pub fn bundled_products() -> Vec<Product> {
    serde_json::from_str(BUNDLED_CATALOG).expect("bundled catalog should parse")
}

/// A full in-process storefront.
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
    pub storage: Arc<dyn Storage>,
}

impl TestContext {
    /// Storefront over fresh in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    /// Storefront whose cart is hydrated from `storage`.
    #[must_use]
    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self::build(storage, Duration::ZERO)
    }

    /// Storefront whose checkout takes `delay` to confirm an order.
    #[must_use]
    pub fn with_checkout_delay(delay: Duration) -> Self {
        Self::build(Arc::new(MemoryStorage::new()), delay)
    }

    fn build(storage: Arc<dyn Storage>, checkout_delay: Duration) -> Self {
        let cart = CartStore::open(Arc::clone(&storage));
        let catalog = Catalog::from_products(bundled_products(), Latency::NONE);
        let state = AppState::from_parts(cart, catalog, CheckoutService::new(checkout_delay));

        Self {
            app: routes::app(state.clone()),
            state,
            storage,
        }
    }

    /// Send a request and return the status plus the body parsed as JSON
    /// (`Value::Null` for an empty body, a string for non-JSON text).
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A checkout form that passes validation.
#[must_use]
pub fn valid_checkout_form() -> Value {
    serde_json::json!({
        "email": "jane@example.com",
        "first_name": "Jane",
        "last_name": "Doe",
        "address": "1 Main St",
        "city": "Austin",
        "state": "TX",
        "zip_code": "73301",
        "phone": "+1 (512) 555-0100",
        "payment_method": "card",
        "card_number": "4242 4242 4242 4242",
        "expiry_date": "12/30",
        "cvv": "123",
        "name_on_card": "Jane Doe"
    })
}
