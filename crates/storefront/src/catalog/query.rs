//! Filtering, sorting and pagination over an in-memory product list.
//!
//! Everything here is synchronous and pure; the async [`Catalog`] service
//! loads the list and delegates to these functions.
//!
//! [`Catalog`]: super::Catalog

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::product::Product;

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Ordering applied to a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    /// Highest rating first.
    Rating,
    Newest,
    Oldest,
    /// Most reviewed first.
    Popular,
    /// Featured products first, then newest.
    Featured,
}

impl SortOrder {
    /// Parse a sort parameter. Empty means "no sorting"; any unrecognized
    /// value falls back to [`SortOrder::Featured`].
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let order = match value.trim() {
            "" => return None,
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "rating" => Self::Rating,
            "newest" => Self::Newest,
            "oldest" => Self::Oldest,
            "popular" => Self::Popular,
            _ => Self::Featured,
        };
        Some(order)
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::Rating => b.rating.total_cmp(&a.rating),
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::Oldest => a.created_at.cmp(&b.created_at),
            Self::Popular => b.reviews_count.cmp(&a.reviews_count),
            Self::Featured => b
                .featured
                .cmp(&a.featured)
                .then_with(|| b.created_at.cmp(&a.created_at)),
        }
    }
}

fn deserialize_sort<'de, D>(deserializer: D) -> Result<Option<SortOrder>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(SortOrder::parse))
}

/// Listing parameters. Every filter is optional and they combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub color: Option<String>,
    pub size: Option<String>,
    /// Minimum rating.
    pub rating: Option<f64>,
    pub in_stock: bool,
    pub featured: bool,
    #[serde(deserialize_with = "deserialize_sort")]
    pub sort: Option<SortOrder>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Extra filters for free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub category: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Matches before pagination.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

/// Run a listing query: filter, sort, then paginate.
#[must_use]
pub fn run_query(products: &[Product], query: &ProductQuery) -> ProductPage {
    let mut matches: Vec<&Product> = products
        .iter()
        .filter(|product| matches_query(product, query))
        .collect();

    if let Some(order) = query.sort {
        matches.sort_by(|a, b| order.compare(a, b));
    }

    paginate(&matches, query.page, query.limit)
}

/// Free-text search that also matches category names, narrowed by `filters`.
#[must_use]
pub fn search(products: &[Product], term: &str, filters: &SearchFilters) -> Vec<Product> {
    let term = term.trim().to_lowercase();

    products
        .iter()
        .filter(|product| term.is_empty() || matches_text(product, &term, true))
        .filter(|product| {
            filters
                .category
                .as_ref()
                .is_none_or(|category| product.categories.contains(category))
        })
        .filter(|product| within_price(product, filters.price_min, filters.price_max))
        .cloned()
        .collect()
}

fn matches_query(product: &Product, query: &ProductQuery) -> bool {
    if let Some(category) = &query.category {
        if !product.categories.contains(category) {
            return false;
        }
    }

    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        if !matches_text(product, &term.to_lowercase(), false) {
            return false;
        }
    }

    if !within_price(product, query.price_min, query.price_max) {
        return false;
    }

    if let Some(color) = &query.color {
        if !product.colors.contains(color) {
            return false;
        }
    }

    if let Some(size) = &query.size {
        if !product.sizes.contains(size) {
            return false;
        }
    }

    if let Some(rating) = query.rating {
        if product.rating < rating {
            return false;
        }
    }

    (!query.in_stock || product.in_stock()) && (!query.featured || product.featured)
}

/// Case-insensitive substring match; `term` must already be lowercase.
fn matches_text(product: &Product, term: &str, include_categories: bool) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(term);

    contains(&product.title)
        || contains(&product.description)
        || product.tags.iter().any(|tag| contains(tag))
        || (include_categories && product.categories.iter().any(|cat| contains(cat)))
}

fn within_price(product: &Product, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    min.is_none_or(|min| product.price >= min) && max.is_none_or(|max| product.price <= max)
}

fn paginate(matches: &[&Product], page: Option<usize>, limit: Option<usize>) -> ProductPage {
    let page = page.filter(|&p| p > 0).unwrap_or(1);
    let limit = limit.filter(|&l| l > 0).unwrap_or(DEFAULT_PAGE_SIZE);
    let start = (page - 1).saturating_mul(limit);

    ProductPage {
        products: matches
            .iter()
            .skip(start)
            .take(limit)
            .map(|product| (*product).clone())
            .collect(),
        total: matches.len(),
        page,
        limit,
        total_pages: matches.len().div_ceil(limit),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use chrono::{TimeZone, Utc};
    use shopfront_core::ProductId;

    use super::*;

    pub(crate) fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            slug: format!("product-{id}"),
            description: String::new(),
            price: Decimal::new(cents, 2),
            compare_at_price: None,
            images: vec![format!("/images/{id}.jpg")],
            categories: Vec::new(),
            tags: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            rating: 0.0,
            reviews_count: 0,
            stock: 10,
            featured: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(i64::from(id)),
        }
    }

    pub(crate) fn fixture() -> Vec<Product> {
        let mut shirt = product(1, 4500);
        shirt.title = "Linen Shirt".into();
        shirt.categories = vec!["men".into(), "tops".into()];
        shirt.colors = vec!["Blue".into(), "White".into()];
        shirt.sizes = vec!["M".into(), "L".into()];
        shirt.rating = 4.2;
        shirt.reviews_count = 40;

        let mut dress = product(2, 12000);
        dress.title = "Summer Dress".into();
        dress.description = "Light cotton, perfect for linen lovers".into();
        dress.categories = vec!["women".into()];
        dress.colors = vec!["Red".into()];
        dress.sizes = vec!["S".into()];
        dress.rating = 4.8;
        dress.reviews_count = 10;
        dress.featured = true;

        let mut tote = product(3, 2499);
        tote.title = "Canvas Tote".into();
        tote.categories = vec!["accessories".into()];
        tote.tags = vec!["Bag".into()];
        tote.rating = 3.9;
        tote.reviews_count = 120;
        tote.stock = 0;

        let mut boots = product(4, 18000);
        boots.title = "Leather Boots".into();
        boots.categories = vec!["men".into(), "shoes".into()];
        boots.sizes = vec!["L".into()];
        boots.rating = 4.8;
        boots.reviews_count = 5;
        boots.featured = true;

        vec![shirt, dress, tote, boots]
    }

    fn ids(page: &ProductPage) -> Vec<i32> {
        page.products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_no_filters_keeps_dataset_order() {
        let page = run_query(&fixture(), &ProductQuery::default());

        assert_eq!(ids(&page), vec![1, 2, 3, 4]);
        assert_eq!(page.total, 4);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_category_filter() {
        let query = ProductQuery {
            category: Some("men".into()),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![1, 4]);
    }

    #[test]
    fn test_search_matches_title_description_and_tags() {
        let query = ProductQuery {
            search: Some("LINEN".into()),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![1, 2]);

        let query = ProductQuery {
            search: Some("bag".into()),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![3]);
    }

    #[test]
    fn test_listing_search_ignores_categories() {
        let query = ProductQuery {
            search: Some("accessories".into()),
            ..ProductQuery::default()
        };
        assert!(run_query(&fixture(), &query).products.is_empty());
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let query = ProductQuery {
            price_min: Some(Decimal::new(4500, 2)),
            price_max: Some(Decimal::new(12000, 2)),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![1, 2]);
    }

    #[test]
    fn test_attribute_filters() {
        let query = ProductQuery {
            size: Some("L".into()),
            rating: Some(4.5),
            featured: true,
            ..ProductQuery::default()
        };
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![4]);

        let query = ProductQuery {
            color: Some("Blue".into()),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![1]);
    }

    #[test]
    fn test_in_stock_filter() {
        let query = ProductQuery {
            in_stock: true,
            ..ProductQuery::default()
        };
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![1, 2, 4]);
    }

    #[test]
    fn test_sort_orders() {
        let cases = [
            (SortOrder::PriceAsc, vec![3, 1, 2, 4]),
            (SortOrder::PriceDesc, vec![4, 2, 1, 3]),
            // Stable: 2 and 4 tie on rating
            (SortOrder::Rating, vec![2, 4, 1, 3]),
            (SortOrder::Newest, vec![4, 3, 2, 1]),
            (SortOrder::Oldest, vec![1, 2, 3, 4]),
            (SortOrder::Popular, vec![3, 1, 2, 4]),
            (SortOrder::Featured, vec![4, 2, 3, 1]),
        ];

        for (order, expected) in cases {
            let query = ProductQuery {
                sort: Some(order),
                ..ProductQuery::default()
            };
            assert_eq!(ids(&run_query(&fixture(), &query)), expected, "{order:?}");
        }
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(SortOrder::parse(""), None);
        assert_eq!(SortOrder::parse("price-asc"), Some(SortOrder::PriceAsc));
        assert_eq!(SortOrder::parse("whatever"), Some(SortOrder::Featured));
    }

    #[test]
    fn test_pagination() {
        let query = ProductQuery {
            page: Some(2),
            limit: Some(3),
            ..ProductQuery::default()
        };
        let page = run_query(&fixture(), &query);

        assert_eq!(ids(&page), vec![4]);
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 2);

        let query = ProductQuery {
            page: Some(9),
            limit: Some(3),
            ..ProductQuery::default()
        };
        assert!(run_query(&fixture(), &query).products.is_empty());
    }

    #[test]
    fn test_pagination_zero_values_use_defaults() {
        let query = ProductQuery {
            page: Some(0),
            limit: Some(0),
            ..ProductQuery::default()
        };
        let page = run_query(&fixture(), &query);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_search_includes_categories_and_filters() {
        let results = search(&fixture(), "Shoes", &SearchFilters::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, ProductId::new(4));

        let filters = SearchFilters {
            category: Some("men".into()),
            price_max: Some(Decimal::new(5000, 2)),
            ..SearchFilters::default()
        };
        let results = search(&fixture(), "", &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, ProductId::new(1));
    }
}
