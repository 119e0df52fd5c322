//! Checkout route handler.

use std::time::Duration;

use axum::{Json, extract::State};
use tracing::{instrument, warn};

use crate::checkout::{CheckoutError, CheckoutForm, OrderConfirmation};
use crate::error::Result;
use crate::services::analytics::{self, AnalyticsEvent};
use crate::state::AppState;
use crate::ui::{Toast, ToastKind, UiAction};

const CHECKOUT_TOAST_DURATION: Duration = Duration::from_secs(3);

/// Place an order for the current cart.
///
/// Once the order is confirmed, the ordered lines are taken off the cart.
/// Items added while the order was in flight stay put.
#[instrument(skip(state, form))]
pub async fn place_order(
    State(state): State<AppState>,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<OrderConfirmation>> {
    let snapshot = state.with_cart(|cart| cart.snapshot())?;

    state.with_ui(|ui| ui.apply(UiAction::SetLoading(true)))?;
    let result = state.checkout().place_order(&snapshot, &form).await;
    state.with_ui(|ui| ui.apply(UiAction::SetLoading(false)))?;

    let confirmation = match result {
        Ok(confirmation) => confirmation,
        Err(e) => {
            warn!(error = %e, "Checkout rejected");
            let message = match e {
                CheckoutError::EmptyCart => "Your cart is empty",
                CheckoutError::Invalid(_) => "Please fix the errors below",
            };
            state.with_ui(|ui| {
                ui.push_toast(Toast::new(
                    ToastKind::Error,
                    message,
                    CHECKOUT_TOAST_DURATION,
                ))
            })?;
            return Err(e.into());
        }
    };

    state.with_cart(|cart| cart.remove_ordered(&confirmation.items))?;
    state.with_ui(|ui| {
        ui.push_toast(Toast::new(
            ToastKind::Success,
            format!("Order {} placed successfully!", confirmation.order_id),
            CHECKOUT_TOAST_DURATION,
        ))
    })?;

    analytics::track(&AnalyticsEvent::Purchase {
        order_id: confirmation.order_id.clone(),
        total: confirmation.totals.total,
        items: confirmation.items.len(),
    });

    Ok(Json(confirmation))
}
