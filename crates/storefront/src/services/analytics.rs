//! Mock analytics tracker.
//!
//! Events are emitted as structured `tracing` events on the `analytics`
//! target instead of being sent to a third-party collector. Route them with
//! `RUST_LOG=analytics=info`.

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::ProductId;
use tracing::info;

/// Tracing target for analytics events.
pub const TARGET: &str = "analytics";

/// Something worth tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    PageView {
        page: String,
    },
    ProductView {
        product_id: ProductId,
        product_name: String,
    },
    AddToCart {
        product_id: ProductId,
        product_name: String,
        price: Decimal,
        quantity: u32,
    },
    Purchase {
        order_id: String,
        total: Decimal,
        items: usize,
    },
    Search {
        query: String,
        results: usize,
    },
}

impl AnalyticsEvent {
    /// Event name as reported to collectors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PageView { .. } => "page_view",
            Self::ProductView { .. } => "product_view",
            Self::AddToCart { .. } => "add_to_cart",
            Self::Purchase { .. } => "purchase",
            Self::Search { .. } => "search",
        }
    }
}

/// Record `event`.
pub fn track(event: &AnalyticsEvent) {
    match event {
        AnalyticsEvent::PageView { page } => {
            info!(target: TARGET, event = event.name(), %page);
        }
        AnalyticsEvent::ProductView {
            product_id,
            product_name,
        } => {
            info!(target: TARGET, event = event.name(), %product_id, %product_name);
        }
        AnalyticsEvent::AddToCart {
            product_id,
            product_name,
            price,
            quantity,
        } => {
            info!(
                target: TARGET,
                event = event.name(),
                %product_id,
                %product_name,
                %price,
                quantity
            );
        }
        AnalyticsEvent::Purchase {
            order_id,
            total,
            items,
        } => {
            info!(target: TARGET, event = event.name(), %order_id, %total, items);
        }
        AnalyticsEvent::Search { query, results } => {
            info!(target: TARGET, event = event.name(), %query, results);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let event = AnalyticsEvent::AddToCart {
            product_id: ProductId::new(1),
            product_name: "Linen Shirt".into(),
            price: Decimal::new(4999, 2),
            quantity: 2,
        };
        assert_eq!(event.name(), "add_to_cart");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "add_to_cart");
        assert_eq!(json["quantity"], 2);
    }

    #[test]
    fn test_page_view_event() {
        let event = AnalyticsEvent::PageView {
            page: "/products?page=2".into(),
        };
        assert_eq!(event.name(), "page_view");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "page_view");
        assert_eq!(json["page"], "/products?page=2");
        track(&event);
    }

    #[test]
    fn test_track_without_subscriber() {
        track(&AnalyticsEvent::Search {
            query: "tote".into(),
            results: 1,
        });
    }
}
