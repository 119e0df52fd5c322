//! Shopfront storefront library.
//!
//! Cart store, catalog, checkout and UI state behind a JSON API. Exposed as
//! a library so the CLI and the integration tests drive the same code as
//! the server binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod ui;
