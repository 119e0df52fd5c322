//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{DEFAULT_FEATURED_LIMIT, DEFAULT_RELATED_LIMIT, Product, ProductPage, ProductQuery};
use crate::error::Result;
use crate::services::analytics::{self, AnalyticsEvent};
use crate::state::AppState;

/// `?limit=` for the featured and related lists.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Filtered, sorted and paginated product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductPage>> {
    let page = state.catalog().list(&query).await?;

    analytics::track(&AnalyticsEvent::PageView {
        page: format!("/products?page={}", page.page),
    });

    Ok(Json(page))
}

/// Featured products.
#[instrument(skip(state))]
pub async fn featured(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Product>>> {
    let limit = query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT);
    Ok(Json(state.catalog().featured(limit).await?))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = state.catalog().by_slug(&slug).await?;

    analytics::track(&AnalyticsEvent::ProductView {
        product_id: product.id,
        product_name: product.title.clone(),
    });

    Ok(Json(product))
}

/// Products sharing a category with the given product.
#[instrument(skip(state))]
pub async fn related(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Product>>> {
    let product = state.catalog().by_slug(&slug).await?;
    let limit = query.limit.unwrap_or(DEFAULT_RELATED_LIMIT);
    Ok(Json(state.catalog().related(product.id, limit).await?))
}
