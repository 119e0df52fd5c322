//! Search and facet route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{Product, SearchFilters};
use crate::error::Result;
use crate::services::analytics::{self, AnalyticsEvent};
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub q: String,
    pub category: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
}

/// Free-text product search.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let filters = SearchFilters {
        category: query.category,
        price_min: query.price_min,
        price_max: query.price_max,
    };
    let results = state.catalog().search(&query.q, &filters).await?;

    analytics::track(&AnalyticsEvent::Search {
        query: query.q,
        results: results.len(),
    });

    Ok(Json(results))
}

/// Every category in the catalog.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.catalog().categories().await?))
}

/// Every color in the catalog.
pub async fn colors(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.catalog().colors().await?))
}

/// Every size in the catalog.
pub async fn sizes(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.catalog().sizes().await?))
}
