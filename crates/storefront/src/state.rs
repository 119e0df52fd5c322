//! Application state shared across handlers.

use std::sync::{Arc, Mutex};

use crate::cart::{CartStore, FileStorage, StorageError};
use crate::catalog::Catalog;
use crate::checkout::CheckoutService;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::ui::UiState;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The server stands in for a
/// single browser tab, so there is exactly one cart and one UI state. Both
/// sit behind a `std` mutex that is never held across an `.await`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cart: Mutex<CartStore>,
    ui: Mutex<UiState>,
    catalog: Catalog,
    checkout: CheckoutService,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Opens the cart persisted under `config.storage_dir` and points the
    /// catalog at `config.catalog_path` (read lazily).
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created.
    pub fn new(config: &StorefrontConfig) -> Result<Self, StorageError> {
        let storage = FileStorage::open(&config.storage_dir)?;
        let cart = CartStore::open(Arc::new(storage));
        let catalog = Catalog::from_file(&config.catalog_path, config.catalog_latency);

        Ok(Self::from_parts(
            cart,
            catalog,
            CheckoutService::new(config.checkout_delay),
        ))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(cart: CartStore, catalog: Catalog, checkout: CheckoutService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cart: Mutex::new(cart),
                ui: Mutex::new(UiState::default()),
                catalog,
                checkout,
            }),
        }
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    /// Run `f` with exclusive access to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the cart lock is poisoned.
    pub fn with_cart<R>(&self, f: impl FnOnce(&mut CartStore) -> R) -> Result<R, AppError> {
        let mut cart = self
            .inner
            .cart
            .lock()
            .map_err(|_| AppError::Internal("cart lock poisoned".to_string()))?;
        Ok(f(&mut cart))
    }

    /// Run `f` with exclusive access to the UI state.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the UI lock is poisoned.
    pub fn with_ui<R>(&self, f: impl FnOnce(&mut UiState) -> R) -> Result<R, AppError> {
        let mut ui = self
            .inner
            .ui
            .lock()
            .map_err(|_| AppError::Internal("ui lock poisoned".to_string()))?;
        Ok(f(&mut ui))
    }
}
