//! Shopfront Core - Shared types library.
//!
//! This crate provides common types used across all Shopfront components:
//! - `storefront` - Cart store, catalog, checkout and the JSON API
//! - `cli` - Command-line access to the catalog and the persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and emails
//! - [`format`] - Display formatting for prices, numbers, dates and text

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod format;
pub mod types;

pub use types::*;
