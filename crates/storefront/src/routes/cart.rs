//! Cart route handlers.
//!
//! Every mutation returns the full cart view so clients can re-render the
//! drawer and badge from one response.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use shopfront_core::ProductId;
use shopfront_core::format::format_price;
use tracing::instrument;

use crate::cart::{CartError, CartLineItem, CartQuery, CartSnapshot, OrderTotals};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::analytics::{self, AnalyticsEvent};
use crate::state::AppState;
use crate::ui::Toast;

/// Totals formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedTotals {
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

impl From<&OrderTotals> for FormattedTotals {
    fn from(totals: &OrderTotals) -> Self {
        let shipping = if totals.ships_free() {
            "Free".to_string()
        } else {
            format_price(totals.shipping)
        };
        Self {
            subtotal: format_price(totals.subtotal),
            shipping,
            tax: format_price(totals.tax),
            total: format_price(totals.total),
        }
    }
}

/// Cart as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub totals: OrderTotals,
    pub total_items: u64,
    pub formatted: FormattedTotals,
}

impl From<CartSnapshot> for CartView {
    fn from(snapshot: CartSnapshot) -> Self {
        let formatted = FormattedTotals::from(&snapshot.totals);
        Self {
            items: snapshot.items,
            totals: snapshot.totals,
            total_items: snapshot.total_items,
            formatted,
        }
    }
}

/// Badge count.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Current cart contents and totals.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CartView>> {
    let snapshot = state.with_cart(|cart| cart.snapshot())?;
    Ok(Json(snapshot.into()))
}

/// Cart badge count.
pub async fn count(State(state): State<AppState>) -> Result<Json<CartCount>> {
    let count = state.with_cart(|cart| cart.get_total_items())?;
    Ok(Json(CartCount { count }))
}

/// Add a catalog product to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let quantity = request.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(CartError::InvalidQuantity.into());
    }

    let product = state.catalog().by_id(request.product_id).await?;
    if !product.in_stock() {
        return Err(AppError::Conflict(format!("{} is out of stock", product.title)));
    }

    let snapshot = state.with_cart(|cart| {
        cart.add_item(&product, quantity)
            .map(|()| cart.snapshot())
    })??;

    state.with_ui(|ui| ui.push_toast(Toast::success(format!("{} added to cart", product.title))))?;

    let product_id = product.id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));
    analytics::track(&AnalyticsEvent::AddToCart {
        product_id: product.id,
        product_name: product.title.clone(),
        price: product.price,
        quantity,
    });

    Ok(Json(snapshot.into()))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let snapshot = state.with_cart(|cart| {
        cart.update_quantity(id, request.quantity);
        cart.snapshot()
    })?;
    Ok(Json(snapshot.into()))
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let snapshot = state.with_cart(|cart| {
        cart.remove_item(id);
        cart.snapshot()
    })?;
    Ok(Json(snapshot.into()))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<StatusCode> {
    state.with_cart(|cart| cart.clear_cart())?;
    Ok(StatusCode::NO_CONTENT)
}
