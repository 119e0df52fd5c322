//! Product catalog service.
//!
//! Loads the static product list (a JSON array) once, caches it with `moka`
//! (5-minute TTL) and answers listing, lookup and search queries over it.
//! Each query waits a small random delay first so clients exercise their
//! loading states the way they would against a remote API.

mod product;
mod query;

pub use product::Product;
pub use query::{DEFAULT_PAGE_SIZE, ProductPage, ProductQuery, SearchFilters, SortOrder};

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rand::Rng;
use shopfront_core::ProductId;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Default number of featured products returned.
pub const DEFAULT_FEATURED_LIMIT: usize = 8;

/// Default number of related products returned.
pub const DEFAULT_RELATED_LIMIT: usize = 4;

/// Failure reading the catalog file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Catalog query errors.
#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    /// The product list could not be loaded.
    #[error("catalog unavailable: {0}")]
    Unavailable(#[from] Arc<LoadError>),

    /// No product matches the given id or slug.
    #[error("product not found: {0}")]
    NotFound(String),
}

/// Random delay applied before each query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    min: Duration,
    max: Duration,
}

impl Latency {
    /// No delay.
    pub const NONE: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    /// Uniform delay between `min_ms` and `max_ms` (swapped if reversed).
    #[must_use]
    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        let (lo, hi) = if min_ms <= max_ms {
            (min_ms, max_ms)
        } else {
            (max_ms, min_ms)
        };
        Self {
            min: Duration::from_millis(lo),
            max: Duration::from_millis(hi),
        }
    }

    fn sample(&self) -> Option<Duration> {
        if self.max.is_zero() {
            return None;
        }
        let lo = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let hi = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        Some(Duration::from_millis(rand::rng().random_range(lo..=hi)))
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::from_millis(200, 400)
    }
}

enum CatalogSource {
    File(PathBuf),
    Static(Arc<Vec<Product>>),
}

/// Read-only product catalog.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    source: CatalogSource,
    cache: Cache<PathBuf, Arc<Vec<Product>>>,
    latency: Latency,
}

impl Catalog {
    /// Catalog backed by a JSON file, read lazily on first query.
    #[must_use]
    pub fn from_file(path: impl Into<PathBuf>, latency: Latency) -> Self {
        Self::build(CatalogSource::File(path.into()), latency)
    }

    /// Catalog over an in-memory product list.
    #[must_use]
    pub fn from_products(products: Vec<Product>, latency: Latency) -> Self {
        Self::build(CatalogSource::Static(Arc::new(products)), latency)
    }

    fn build(source: CatalogSource, latency: Latency) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogInner {
                source,
                cache,
                latency,
            }),
        }
    }

    /// The full product list, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] if the catalog file cannot be
    /// read or parsed.
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        if let Some(delay) = self.inner.latency.sample() {
            tokio::time::sleep(delay).await;
        }

        match &self.inner.source {
            CatalogSource::Static(products) => Ok(Arc::clone(products)),
            CatalogSource::File(path) => Ok(self
                .inner
                .cache
                .try_get_with(path.clone(), load_file(path.clone()))
                .await?),
        }
    }

    /// Filtered, sorted and paginated listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError> {
        let products = self.products().await?;
        let page = query::run_query(&products, query);
        debug!(total = page.total, returned = page.products.len(), "Listed products");
        Ok(page)
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub async fn by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products()
            .await?
            .iter()
            .find(|product| product.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Look up a product by slug.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown slug.
    #[instrument(skip(self))]
    pub async fn by_slug(&self, slug: &str) -> Result<Product, CatalogError> {
        self.products()
            .await?
            .iter()
            .find(|product| product.slug == slug)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(slug.to_owned()))
    }

    /// The first `limit` featured products.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub async fn featured(&self, limit: usize) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .products()
            .await?
            .iter()
            .filter(|product| product.featured)
            .take(limit)
            .cloned()
            .collect())
    }

    /// Up to `limit` other products sharing a category with `id`.
    /// Unknown ids yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub async fn related(&self, id: ProductId, limit: usize) -> Result<Vec<Product>, CatalogError> {
        let products = self.products().await?;
        let Some(current) = products.iter().find(|product| product.id == id) else {
            return Ok(Vec::new());
        };

        Ok(products
            .iter()
            .filter(|product| {
                product.id != id
                    && product
                        .categories
                        .iter()
                        .any(|cat| current.categories.contains(cat))
            })
            .take(limit)
            .cloned()
            .collect())
    }

    /// Every category, sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        self.distinct(|product| product.categories.as_slice()).await
    }

    /// Every color, sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub async fn colors(&self) -> Result<Vec<String>, CatalogError> {
        self.distinct(|product| product.colors.as_slice()).await
    }

    /// Every size, sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub async fn sizes(&self) -> Result<Vec<String>, CatalogError> {
        self.distinct(|product| product.sizes.as_slice()).await
    }

    /// Free-text search across titles, descriptions, tags and categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        term: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<Product>, CatalogError> {
        let products = self.products().await?;
        Ok(query::search(&products, term, filters))
    }

    async fn distinct(
        &self,
        field: impl Fn(&Product) -> &[String],
    ) -> Result<Vec<String>, CatalogError> {
        let products = self.products().await?;
        let values: BTreeSet<&String> = products.iter().flat_map(|p| field(p)).collect();
        Ok(values.into_iter().cloned().collect())
    }
}

async fn load_file(path: PathBuf) -> Result<Arc<Vec<Product>>, LoadError> {
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
    let products: Vec<Product> =
        serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), count = products.len(), "Catalog loaded");
    Ok(Arc::new(products))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::query::tests::fixture;
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_products(fixture(), Latency::NONE)
    }

    #[tokio::test]
    async fn test_by_slug_and_id() {
        let catalog = catalog();

        let product = catalog.by_slug("product-2").await.unwrap();
        assert_eq!(product.title, "Summer Dress");

        let product = catalog.by_id(ProductId::new(3)).await.unwrap();
        assert_eq!(product.slug, "product-3");

        assert!(matches!(
            catalog.by_slug("missing").await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_featured_respects_limit() {
        let catalog = catalog();
        assert_eq!(catalog.featured(DEFAULT_FEATURED_LIMIT).await.unwrap().len(), 2);
        assert_eq!(catalog.featured(1).await.unwrap()[0].id, ProductId::new(2));
    }

    #[tokio::test]
    async fn test_related_shares_a_category() {
        let catalog = catalog();

        let related = catalog
            .related(ProductId::new(1), DEFAULT_RELATED_LIMIT)
            .await
            .unwrap();
        let ids: Vec<i32> = related.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![4]);

        assert!(catalog.related(ProductId::new(99), 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_distinct_values_sorted() {
        let catalog = catalog();

        assert_eq!(
            catalog.categories().await.unwrap(),
            vec!["accessories", "men", "shoes", "tops", "women"]
        );
        assert_eq!(catalog.sizes().await.unwrap(), vec!["L", "M", "S"]);
        assert_eq!(catalog.colors().await.unwrap(), vec!["Blue", "Red", "White"]);
    }

    #[tokio::test]
    async fn test_file_catalog_loads_and_caches() {
        let dir = std::env::temp_dir().join(format!("shopfront-catalog-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("products.json");
        std::fs::write(&path, serde_json::to_string(&fixture()).unwrap()).unwrap();

        let catalog = Catalog::from_file(&path, Latency::NONE);
        assert_eq!(catalog.products().await.unwrap().len(), 4);

        // Served from cache after the file disappears
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(catalog.list(&ProductQuery::default()).await.unwrap().total, 4);
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let products: Vec<Product> =
            serde_json::from_str(include_str!("../../data/products.json")).unwrap();

        assert_eq!(products.len(), 10);
        assert!(products.iter().all(|p| !p.images.is_empty()));
        assert!(products.iter().any(|p| !p.in_stock()));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let catalog = Catalog::from_file("/nonexistent/products.json", Latency::NONE);
        assert!(matches!(
            catalog.products().await,
            Err(CatalogError::Unavailable(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let catalog = Catalog::from_products(fixture(), Latency::from_millis(300, 300));

        let started = tokio::time::Instant::now();
        catalog.products().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn test_latency_from_millis_orders_bounds() {
        assert_eq!(Latency::from_millis(400, 200), Latency::from_millis(200, 400));
        assert_eq!(Latency::NONE.sample(), None);
    }
}
