//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Health check
//!
//! # Catalog
//! GET    /api/products                - Filtered, sorted, paginated listing
//! GET    /api/products/featured       - Featured products (?limit)
//! GET    /api/products/{slug}         - Product detail
//! GET    /api/products/{slug}/related - Related products (?limit)
//! GET    /api/categories              - Category facet
//! GET    /api/colors                  - Color facet
//! GET    /api/sizes                   - Size facet
//! GET    /api/search                  - Free-text search (?q&category&price_min&price_max)
//!
//! # Cart
//! GET    /api/cart                    - Items, totals and badge count
//! GET    /api/cart/count              - Badge count
//! POST   /api/cart/items              - Add a product
//! PUT    /api/cart/items/{id}         - Set quantity
//! DELETE /api/cart/items/{id}         - Remove a line
//! DELETE /api/cart                    - Empty the cart
//!
//! # Checkout
//! POST   /api/checkout                - Place a simulated order
//!
//! # UI
//! GET    /api/ui                      - Drawer, modal, toasts, cart count
//! POST   /api/ui/cart-drawer          - Toggle the cart drawer
//! DELETE /api/ui/toasts/{id}          - Dismiss a toast
//! ```

pub mod cart;
pub mod checkout;
pub mod products;
pub mod search;
pub mod ui;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{slug}", get(products::show))
        .route("/{slug}/related", get(products::related))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/count", get(cart::count))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::update).delete(cart::remove))
}

/// Create the UI state routes router.
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(ui::show))
        .route("/cart-drawer", post(ui::toggle_cart_drawer))
        .route("/toasts/{id}", delete(ui::dismiss_toast))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .route("/api/categories", get(search::categories))
        .route("/api/colors", get(search::colors))
        .route("/api/sizes", get(search::sizes))
        .route("/api/search", get(search::search))
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(checkout::place_order))
        .nest("/api/ui", ui_routes())
}

/// Build the full application: routes, health check, tracing, request ids
/// and CORS. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
