//! UI state route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::error::Result;
use crate::state::AppState;
use crate::ui::{UiAction, UiSnapshot};

fn snapshot(state: &AppState) -> Result<UiSnapshot> {
    let cart = state.with_cart(|cart| cart.snapshot())?;
    state.with_ui(|ui| {
        ui.prune_expired(chrono::Utc::now());
        UiSnapshot::capture(ui, &cart)
    })
}

/// Current UI state with the cart badge count.
pub async fn show(State(state): State<AppState>) -> Result<Json<UiSnapshot>> {
    Ok(Json(snapshot(&state)?))
}

/// Open or close the cart drawer.
pub async fn toggle_cart_drawer(State(state): State<AppState>) -> Result<Json<UiSnapshot>> {
    state.with_ui(|ui| ui.apply(UiAction::ToggleCartDrawer))?;
    Ok(Json(snapshot(&state)?))
}

/// Dismiss a toast. Unknown ids are ignored.
pub async fn dismiss_toast(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.with_ui(|ui| ui.apply(UiAction::RemoveToast(id)))?;
    Ok(StatusCode::NO_CONTENT)
}
