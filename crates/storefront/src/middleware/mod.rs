//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (recorded into the span above)
//! 4. CORS (the JSON API is called from browser clients on other origins)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
