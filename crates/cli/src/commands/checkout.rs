//! Checkout command.
//!
//! # Usage
//!
//! ```bash
//! shop-cli checkout --details order.yaml
//! ```
//!
//! The YAML file holds the checkout form fields:
//!
//! ```yaml
//! email: jane@example.com
//! first_name: Jane
//! last_name: Doe
//! address: 1 Main St
//! city: Austin
//! state: TX
//! zip_code: "73301"
//! phone: "+1 512 555 0100"
//! payment_method: card
//! card_number: "4242 4242 4242 4242"
//! expiry_date: "12/30"
//! cvv: "123"
//! name_on_card: Jane Doe
//! ```

use std::path::Path;

use shopfront_core::format::format_price;
use shopfront_storefront::cart::CartStore;
use shopfront_storefront::checkout::{CheckoutError, CheckoutForm, OrderConfirmation};

use super::{CliError, Context};

/// Parse checkout details from YAML.
pub fn parse_details(yaml: &str) -> Result<CheckoutForm, CliError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Place an order for the current cart and clear it on success.
pub async fn run(
    ctx: &Context,
    cart: &mut CartStore,
    details: &Path,
) -> Result<OrderConfirmation, CliError> {
    let yaml = tokio::fs::read_to_string(details)
        .await
        .map_err(|source| CliError::ReadDetails {
            path: details.display().to_string(),
            source,
        })?;
    let form = parse_details(&yaml)?;

    tracing::info!("Placing order...");
    let confirmation = match ctx.checkout().place_order(&cart.snapshot(), &form).await {
        Ok(confirmation) => confirmation,
        Err(CheckoutError::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                tracing::warn!("{field}: {message}");
            }
            return Err(CheckoutError::Invalid(errors).into());
        }
        Err(e) => return Err(e.into()),
    };

    cart.clear_cart();
    tracing::info!(
        "Order {} placed, total {}",
        confirmation.order_id,
        format_price(confirmation.totals.total)
    );
    Ok(confirmation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::ProductId;
    use shopfront_storefront::cart::CartQuery;
    use shopfront_storefront::checkout::PaymentMethod;

    use super::*;
    use crate::commands::cart::tests::context;

    const DETAILS: &str = r#"
email: jane@example.com
first_name: Jane
last_name: Doe
address: 1 Main St
city: Austin
state: TX
zip_code: "73301"
phone: "+1 512 555 0100"
payment_method: paypal
"#;

    #[test]
    fn test_parse_details_defaults() {
        let form = parse_details(DETAILS).unwrap();
        assert_eq!(form.payment_method, PaymentMethod::Paypal);
        assert_eq!(form.country, "US");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_parse_details_rejects_garbage() {
        assert!(matches!(
            parse_details("- not\n- a map"),
            Err(CliError::ParseDetails(_))
        ));
    }

    #[tokio::test]
    async fn test_checkout_clears_cart() {
        let (ctx, dir) = context();
        let details = dir.join("order.yaml");
        let mut cart = ctx.open_cart().unwrap();
        std::fs::write(&details, DETAILS).unwrap();

        let product = ctx.catalog().by_id(ProductId::new(2)).await.unwrap();
        cart.add_item(&product, 2).unwrap();

        let confirmation = run(&ctx, &mut cart, &details).await.unwrap();

        assert!(confirmation.order_id.starts_with("ORD-"));
        assert_eq!(confirmation.items.len(), 1);
        assert!(CartQuery::is_empty(&cart));
        assert!(ctx.open_cart().unwrap().items().is_empty());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let (ctx, dir) = context();
        let details = dir.join("order.yaml");
        let mut cart = ctx.open_cart().unwrap();
        std::fs::write(&details, DETAILS).unwrap();

        let err = run(&ctx, &mut cart, &details).await.unwrap_err();

        assert!(matches!(err, CliError::Checkout(CheckoutError::EmptyCart)));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
