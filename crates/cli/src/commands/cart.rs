//! Cart commands.
//!
//! The cart lives in `STOREFRONT_STORAGE_DIR`, so changes made here show up
//! in the storefront server on its next start, and vice versa.

use shopfront_core::ProductId;
use shopfront_core::format::format_price;
use shopfront_storefront::cart::{CartQuery, CartStore};

use super::{CliError, Context};

/// Print items and totals.
pub fn show(cart: &CartStore) {
    if cart.items().is_empty() {
        tracing::info!("Your cart is empty");
        return;
    }

    for item in cart.items() {
        tracing::info!(
            "#{:<3} {:<28} {} x {:>3} = {:>10}",
            item.id.as_i32(),
            item.title,
            format_price(item.price),
            item.quantity,
            format_price(item.line_total())
        );
    }

    let totals = cart.totals();
    let shipping = if totals.ships_free() {
        "Free".to_string()
    } else {
        format_price(totals.shipping)
    };
    tracing::info!("Items:    {}", cart.get_total_items());
    tracing::info!("Subtotal: {}", format_price(totals.subtotal));
    tracing::info!("Shipping: {shipping}");
    tracing::info!("Tax:      {}", format_price(totals.tax));
    tracing::info!("Total:    {}", format_price(totals.total));
}

/// Add a catalog product.
pub async fn add(
    ctx: &Context,
    cart: &mut CartStore,
    product_id: ProductId,
    quantity: u32,
) -> Result<(), CliError> {
    let product = ctx.catalog().by_id(product_id).await?;
    if !product.in_stock() {
        return Err(CliError::OutOfStock(product.title));
    }

    cart.add_item(&product, quantity)?;
    tracing::info!(
        "Added {quantity} x {} ({} in cart)",
        product.title,
        cart.get_item_quantity(product_id)
    );
    Ok(())
}

/// Set a line's quantity.
pub fn set(cart: &mut CartStore, product_id: ProductId, quantity: i64) {
    cart.update_quantity(product_id, quantity);
    match cart.get_item_quantity(product_id) {
        0 => tracing::info!("Product {product_id} is not in the cart"),
        n => tracing::info!("Product {product_id} quantity is now {n}"),
    }
}

/// Remove a line.
pub fn remove(cart: &mut CartStore, product_id: ProductId) {
    cart.remove_item(product_id);
    tracing::info!("Removed product {product_id}");
}

/// Empty the cart.
pub fn clear(cart: &mut CartStore) {
    cart.clear_cart();
    tracing::info!("Cart cleared");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use shopfront_storefront::catalog::Latency;
    use shopfront_storefront::config::StorefrontConfig;

    use super::*;

    /// Context over the bundled catalog and a fresh storage directory.
    pub fn context() -> (Context, PathBuf) {
        let dir = std::env::temp_dir().join(format!("shop-cli-{}", uuid::Uuid::new_v4()));
        let mut config = StorefrontConfig::from_lookup(|_| None).unwrap();
        config.storage_dir = dir.clone();
        config.catalog_path =
            PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/data/products.json"));
        config.checkout_delay = Duration::ZERO;
        config.catalog_latency = Latency::NONE;
        (Context::new(config), dir)
    }

    #[tokio::test]
    async fn test_add_persists_across_opens() {
        let (ctx, dir) = context();

        let mut cart = ctx.open_cart().unwrap();
        add(&ctx, &mut cart, ProductId::new(1), 2).await.unwrap();
        add(&ctx, &mut cart, ProductId::new(1), 1).await.unwrap();
        drop(cart);

        let cart = ctx.open_cart().unwrap();
        assert_eq!(cart.get_item_quantity(ProductId::new(1)), 3);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_add_out_of_stock() {
        let (ctx, dir) = context();
        let mut cart = ctx.open_cart().unwrap();

        let err = add(&ctx, &mut cart, ProductId::new(5), 1).await.unwrap_err();

        assert!(matches!(err, CliError::OutOfStock(_)));
        assert!(cart.items().is_empty());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_set_and_remove() {
        let (ctx, dir) = context();
        let mut cart = ctx.open_cart().unwrap();
        add(&ctx, &mut cart, ProductId::new(3), 1).await.unwrap();
        add(&ctx, &mut cart, ProductId::new(7), 1).await.unwrap();

        set(&mut cart, ProductId::new(3), 4);
        assert_eq!(cart.get_item_quantity(ProductId::new(3)), 4);

        set(&mut cart, ProductId::new(3), -1);
        remove(&mut cart, ProductId::new(7));
        assert!(cart.items().is_empty());

        std::fs::remove_dir_all(dir).unwrap();
    }
}
