//! Subcommand implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;

use std::sync::Arc;

use shopfront_storefront::cart::{CartError, CartStore, FileStorage, StorageError};
use shopfront_storefront::catalog::{Catalog, CatalogError, Latency};
use shopfront_storefront::checkout::{CheckoutError, CheckoutService};
use shopfront_storefront::config::{ConfigError, StorefrontConfig};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Cart(#[from] CartError),

    #[error("Checkout failed: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("Failed to read {path}: {source}")]
    ReadDetails {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid checkout details: {0}")]
    ParseDetails(#[from] serde_yaml::Error),
}

/// Shared handles built from the storefront configuration.
pub struct Context {
    config: StorefrontConfig,
    catalog: Catalog,
}

impl Context {
    /// Load configuration from the environment.
    ///
    /// Catalog latency is disabled; it only matters for UI loading states.
    pub fn from_env() -> Result<Self, CliError> {
        Ok(Self::new(StorefrontConfig::from_env()?))
    }

    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = Catalog::from_file(&config.catalog_path, Latency::NONE);
        Self { config, catalog }
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub const fn checkout(&self) -> CheckoutService {
        CheckoutService::new(self.config.checkout_delay)
    }

    /// Open the cart persisted under the configured storage directory.
    pub fn open_cart(&self) -> Result<CartStore, CliError> {
        let storage = FileStorage::open(&self.config.storage_dir)?;
        Ok(CartStore::open(Arc::new(storage)))
    }
}
