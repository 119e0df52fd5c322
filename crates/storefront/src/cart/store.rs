//! The cart store: reducer + persistence + change notification.

use std::sync::Arc;

use serde::Serialize;
use shopfront_core::ProductId;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, instrument, warn};

use super::item::{CartAction, CartLineItem, CartState, Purchasable};
use super::storage::Storage;
use super::totals::{OrderTotals, PricingPolicy};

/// Storage slot holding the serialized item list.
pub const CART_STORAGE_KEY: &str = "cart";

/// Rejected cart mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Quantities added to the cart must be at least 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The product has no image to snapshot into the line item.
    #[error("product {0} has no image")]
    MissingImage(ProductId),
}

/// Read-only view of the cart used by other layers.
pub trait CartQuery {
    /// Quantity in the cart for `id`, or 0.
    fn get_item_quantity(&self, id: ProductId) -> u32;

    /// Sum of quantities across all lines (the badge count).
    fn get_total_items(&self) -> u64;

    /// Whether the cart has no lines.
    fn is_empty(&self) -> bool {
        self.get_total_items() == 0
    }
}

/// Point-in-time copy of the cart handed to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub totals: OrderTotals,
    pub total_items: u64,
}

impl CartSnapshot {
    fn capture(state: &CartState, policy: &PricingPolicy) -> Self {
        Self {
            items: state.items().to_vec(),
            totals: OrderTotals::compute(state.items(), policy),
            total_items: state.total_items(),
        }
    }
}

impl CartQuery for CartSnapshot {
    fn get_item_quantity(&self, id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map_or(0, |item| item.quantity)
    }

    fn get_total_items(&self) -> u64 {
        self.total_items
    }
}

/// Owner of the cart.
///
/// Single writer: every mutation takes `&mut self`. Readers either borrow
/// the store or [`subscribe`](Self::subscribe) to snapshots.
pub struct CartStore {
    state: CartState,
    policy: PricingPolicy,
    storage: Arc<dyn Storage>,
    updates: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Open the cart persisted in `storage` with standard pricing.
    ///
    /// A missing or unreadable snapshot yields an empty cart.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        Self::with_policy(storage, PricingPolicy::default())
    }

    /// Open the cart persisted in `storage` with custom pricing.
    #[must_use]
    pub fn with_policy(storage: Arc<dyn Storage>, policy: PricingPolicy) -> Self {
        let mut state = CartState::default();
        if let Some(items) = load_persisted(storage.as_ref()) {
            state.apply(CartAction::Load(items));
        }
        debug!(lines = state.items().len(), "Cart hydrated");

        let (updates, _) = watch::channel(CartSnapshot::capture(&state, &policy));
        let store = Self {
            state,
            policy,
            storage,
            updates,
        };
        // Rewrite the slot so it holds the normalized list
        store.persist();
        store
    }

    /// Add `quantity` of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity and
    /// [`CartError::MissingImage`] when the product has no image.
    #[instrument(skip(self, product), fields(product_id = %product.id()))]
    pub fn add_item(
        &mut self,
        product: &(impl Purchasable + ?Sized),
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let item = CartLineItem::from_product(product, quantity)
            .ok_or_else(|| CartError::MissingImage(product.id()))?;

        self.dispatch(CartAction::Add(item));
        Ok(())
    }

    /// Add a single unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingImage`] when the product has no image.
    pub fn add_one(&mut self, product: &(impl Purchasable + ?Sized)) -> Result<(), CartError> {
        self.add_item(product, 1)
    }

    /// Set the quantity of the line for `id`. Zero or less removes it;
    /// unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        self.dispatch(CartAction::UpdateQuantity { id, quantity });
    }

    /// Remove the line for `id`, if present.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: ProductId) {
        self.dispatch(CartAction::Remove { id });
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    /// Take `ordered` lines off the cart after a purchase.
    ///
    /// Anything added while the order was in flight stays in the cart.
    #[instrument(skip_all, fields(lines = ordered.len()))]
    pub fn remove_ordered(&mut self, ordered: &[CartLineItem]) {
        let lines = ordered.iter().map(|item| (item.id, item.quantity)).collect();
        self.dispatch(CartAction::Deduct(lines));
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        self.state.items()
    }

    /// Totals for the current items, recomputed on each call.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::compute(self.state.items(), &self.policy)
    }

    /// Items, totals and badge count as one owned value.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::capture(&self.state, &self.policy)
    }

    /// Receive a new snapshot after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.updates.subscribe()
    }

    #[must_use]
    pub const fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    fn dispatch(&mut self, action: CartAction) {
        self.state.apply(action);
        self.persist();
        self.updates.send_replace(self.snapshot());
    }

    fn persist(&self) {
        let json = match serde_json::to_string(self.state.items()) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(CART_STORAGE_KEY, &json) {
            error!(error = %e, "Failed to persist cart");
        }
    }
}

impl CartQuery for CartStore {
    fn get_item_quantity(&self, id: ProductId) -> u32 {
        self.state.item_quantity(id)
    }

    fn get_total_items(&self) -> u64 {
        self.state.total_items()
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Read the persisted item list, discarding anything unreadable.
fn load_persisted(storage: &dyn Storage) -> Option<Vec<CartLineItem>> {
    let raw = match storage.get_item(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "Failed to read persisted cart, starting empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => Some(items),
        Err(e) => {
            warn!(error = %e, "Discarding unparseable persisted cart");
            None
        }
    }
}
