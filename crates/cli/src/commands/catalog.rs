//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! shop-cli catalog list --category women --sort price-asc
//! shop-cli catalog list --price-max '$100'
//! shop-cli catalog show classic-linen-shirt
//! shop-cli catalog show "Classic Linen Shirt"
//! shop-cli catalog categories
//! ```

use rust_decimal::Decimal;
use shopfront_core::Price;
use shopfront_core::format::{
    capitalize_first, format_date, format_number, format_price, parse_price, slugify, truncate_text,
};
use shopfront_storefront::catalog::{Product, ProductQuery, SortOrder};

use super::{CliError, Context};

const DESCRIPTION_PREVIEW_CHARS: usize = 60;

/// Filters accepted by `catalog list`.
#[derive(Debug, Default)]
pub struct ListArgs {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    /// Free-form price such as `$1,200` or `99.50`.
    pub price_max: Option<String>,
    pub in_stock: bool,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl From<ListArgs> for ProductQuery {
    fn from(args: ListArgs) -> Self {
        Self {
            category: args.category,
            search: args.search,
            price_max: args.price_max.as_deref().and_then(parse_price),
            in_stock: args.in_stock,
            sort: args.sort.as_deref().and_then(SortOrder::parse),
            page: args.page,
            limit: args.limit,
            ..Self::default()
        }
    }
}

/// One-line summary used by listings.
pub fn summary_line(product: &Product) -> String {
    let stock = if product.in_stock() { "" } else { " (out of stock)" };
    format!(
        "#{:<3} {:<28} {:>10}{stock}",
        product.id.as_i32(),
        product.title,
        format_price(product.price)
    )
}

/// List a page of products.
pub async fn list(ctx: &Context, args: ListArgs) -> Result<(), CliError> {
    let page = ctx.catalog().list(&args.into()).await?;

    for product in &page.products {
        tracing::info!("{}", summary_line(product));
    }
    tracing::info!(
        "Page {} of {} ({} products)",
        page.page,
        page.total_pages.max(1),
        page.total
    );
    Ok(())
}

/// Show one product in full. Accepts a slug or a product title.
pub async fn show(ctx: &Context, slug_or_title: &str) -> Result<(), CliError> {
    let product = ctx.catalog().by_slug(&slugify(slug_or_title)).await?;
    let price = Price::usd(product.price);

    tracing::info!("{} (#{})", product.title, product.id);
    match product.compare_at_price.filter(|_| product.on_sale()) {
        Some(was) => tracing::info!(
            "Price: {} (was {})",
            price.display(),
            Price::usd(was).display()
        ),
        None => tracing::info!("Price: {}", price.display()),
    }
    tracing::info!(
        "{}",
        truncate_text(&product.description, DESCRIPTION_PREVIEW_CHARS)
    );
    tracing::info!(
        "Rating: {} from {} reviews",
        product.rating,
        format_number(Decimal::from(product.reviews_count))
    );
    tracing::info!("In stock: {}", product.stock);
    if !product.colors.is_empty() {
        tracing::info!("Colors: {}", product.colors.join(", "));
    }
    if !product.sizes.is_empty() {
        tracing::info!("Sizes: {}", product.sizes.join(", "));
    }
    tracing::info!("Added {}", format_date(product.created_at.date_naive()));
    Ok(())
}

/// List every category.
pub async fn categories(ctx: &Context) -> Result<(), CliError> {
    for category in ctx.catalog().categories().await? {
        tracing::info!("{}", capitalize_first(&category));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args_into_query() {
        let query: ProductQuery = ListArgs {
            category: Some("women".into()),
            sort: Some("price-desc".into()),
            in_stock: true,
            ..ListArgs::default()
        }
        .into();

        assert_eq!(query.category.as_deref(), Some("women"));
        assert_eq!(query.sort, Some(SortOrder::PriceDesc));
        assert!(query.in_stock);
        assert_eq!(query.page, None);
    }

    #[test]
    fn test_price_max_accepts_formatted_prices() {
        let query: ProductQuery = ListArgs {
            price_max: Some("$1,200.50".into()),
            ..ListArgs::default()
        }
        .into();
        assert_eq!(query.price_max, Some(Decimal::new(120_050, 2)));

        let query: ProductQuery = ListArgs {
            price_max: Some("cheap".into()),
            ..ListArgs::default()
        }
        .into();
        assert_eq!(query.price_max, None);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_featured() {
        let query: ProductQuery = ListArgs {
            sort: Some("cheapest".into()),
            ..ListArgs::default()
        }
        .into();
        assert_eq!(query.sort, Some(SortOrder::Featured));
    }
}
