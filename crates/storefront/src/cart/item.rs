//! Cart line items and the pure cart reducer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::ProductId;

/// Anything that can be put in the cart.
///
/// The cart only copies these fields at add-time; it never holds a
/// reference back to the catalog.
pub trait Purchasable {
    /// Product identifier, the cart's uniqueness key.
    fn id(&self) -> ProductId;
    /// Display name.
    fn title(&self) -> &str;
    /// Current unit price.
    fn price(&self) -> Decimal;
    /// First image, if the product has any.
    fn primary_image(&self) -> Option<&str>;
    /// Human-readable identifier used to link back to the product.
    fn slug(&self) -> &str;
}

/// One row in the cart.
///
/// `title`, `price`, `image` and `slug` are a snapshot taken when the
/// product was first added; later catalog changes do not touch them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub slug: String,
    pub quantity: u32,
}

impl CartLineItem {
    /// Snapshot a product into a new line item.
    ///
    /// Returns `None` if the product has no image to capture.
    #[must_use]
    pub fn from_product(product: &(impl Purchasable + ?Sized), quantity: u32) -> Option<Self> {
        Some(Self {
            id: product.id(),
            title: product.title().to_owned(),
            price: product.price(),
            image: product.primary_image()?.to_owned(),
            slug: product.slug().to_owned(),
            quantity,
        })
    }

    /// `price * quantity`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Cart transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Append a line, or increment the existing line with the same id.
    Add(CartLineItem),
    /// Set the quantity of a line; non-positive values remove it.
    UpdateQuantity { id: ProductId, quantity: i64 },
    /// Drop a line.
    Remove { id: ProductId },
    /// Drop every line.
    Clear,
    /// Take the given quantities off their lines, dropping lines that reach 0.
    Deduct(Vec<(ProductId, u32)>),
    /// Replace the contents with a hydrated snapshot.
    Load(Vec<CartLineItem>),
}

/// The cart's item list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<CartLineItem>,
}

impl CartState {
    /// Apply one action. Both cart invariants hold afterwards.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(item) => self.add(item),
            CartAction::UpdateQuantity { id, quantity } => {
                let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
                for item in self.items.iter_mut().filter(|item| item.id == id) {
                    item.quantity = quantity;
                }
                self.items.retain(|item| item.quantity > 0);
            }
            CartAction::Remove { id } => self.items.retain(|item| item.id != id),
            CartAction::Clear => self.items.clear(),
            CartAction::Deduct(lines) => {
                for (id, quantity) in lines {
                    for item in self.items.iter_mut().filter(|item| item.id == id) {
                        item.quantity = item.quantity.saturating_sub(quantity);
                    }
                }
                self.items.retain(|item| item.quantity > 0);
            }
            CartAction::Load(items) => {
                self.items.clear();
                for item in items {
                    if item.price.is_sign_negative() && !item.price.is_zero() {
                        continue;
                    }
                    self.add(item);
                }
            }
        }
    }

    fn add(&mut self, item: CartLineItem) {
        if item.quantity == 0 {
            return;
        }

        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Quantity of the line for `id`, or 0.
    #[must_use]
    pub fn item_quantity(&self, id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map_or(0, |item| item.quantity)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
