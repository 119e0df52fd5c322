//! Shopping cart: line items, derived totals and persistence.
//!
//! The cart is a plain owned value ([`CartStore`]), never a global. Its
//! transitions live in a pure reducer ([`CartState::apply`]); the store wraps
//! the reducer and, after every action, writes the item list to a
//! [`Storage`] slot and publishes a fresh [`CartSnapshot`] to subscribers.
//!
//! # Invariants
//!
//! - At most one line item per product id; adding an existing id increments it.
//! - No line item is ever kept with a quantity of zero.
//!
//! # Persisted layout
//!
//! A single slot named [`CART_STORAGE_KEY`] holds a JSON array of
//! `{id, title, price, image, slug, quantity}` objects.

mod item;
mod storage;
mod store;
mod totals;

pub use item::{CartAction, CartLineItem, CartState, Purchasable};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{CART_STORAGE_KEY, CartError, CartQuery, CartSnapshot, CartStore};
pub use totals::{OrderTotals, PricingPolicy};
