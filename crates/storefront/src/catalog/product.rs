//! Catalog product records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::ProductId;

use crate::cart::Purchasable;

/// A product from the static catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub compare_at_price: Option<Decimal>,
    pub images: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether the product is discounted against its compare-at price.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.compare_at_price
            .is_some_and(|compare_at| compare_at > self.price)
    }
}

impl Purchasable for Product {
    fn id(&self) -> ProductId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn price(&self) -> Decimal {
        self.price
    }

    fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    fn slug(&self) -> &str {
        &self.slug
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "id": 3,
        "title": "Canvas Tote",
        "slug": "canvas-tote",
        "description": "Heavy canvas bag",
        "price": 24.99,
        "compareAtPrice": 34.99,
        "images": ["/images/tote-1.jpg", "/images/tote-2.jpg"],
        "categories": ["accessories"],
        "tags": ["bag"],
        "colors": ["Natural"],
        "sizes": [],
        "rating": 4.6,
        "reviewsCount": 88,
        "stock": 12,
        "featured": true,
        "createdAt": "2024-03-01T09:00:00Z"
    }"#;

    #[test]
    fn test_parse_catalog_record() {
        let product: Product = serde_json::from_str(RECORD).unwrap();

        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price, Decimal::new(2499, 2));
        assert_eq!(product.reviews_count, 88);
        assert!(product.on_sale());
        assert!(product.in_stock());
    }

    #[test]
    fn test_optional_fields_default() {
        let product: Product = serde_json::from_str(
            r#"{"id":1,"title":"T","slug":"t","price":5,"images":["/t.jpg"],"createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(product.compare_at_price, None);
        assert!(!product.in_stock());
        assert!(product.categories.is_empty());
    }

    #[test]
    fn test_purchasable_uses_first_image() {
        let product: Product = serde_json::from_str(RECORD).unwrap();
        assert_eq!(product.primary_image(), Some("/images/tote-1.jpg"));
        assert_eq!(Purchasable::slug(&product), "canvas-tote");
    }
}
