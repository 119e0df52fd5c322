//! Side services used by the route handlers.
//!
//! - `analytics` - Mock event tracking through `tracing`

pub mod analytics;
