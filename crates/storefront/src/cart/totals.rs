//! Order totals derived from the cart's line items.
//!
//! Each output is rounded to cents on its own, from full-precision
//! intermediates: `tax` is computed from the unrounded subtotal and `total`
//! from the unrounded subtotal and tax.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::item::CartLineItem;

/// Shipping and tax constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Decimal,
    /// Flat fee charged at or below the threshold.
    pub shipping_fee: Decimal,
    /// Fraction of the subtotal charged as tax.
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::ONE_HUNDRED,
            shipping_fee: Decimal::new(999, 2),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

/// Subtotal, shipping, tax and total for a cart, all in cents precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals in a single pass over `items`.
    ///
    /// An empty cart still reports the flat shipping fee, since a zero
    /// subtotal is not above the free-shipping threshold.
    #[must_use]
    pub fn compute(items: &[CartLineItem], policy: &PricingPolicy) -> Self {
        let subtotal: Decimal = items.iter().map(CartLineItem::line_total).sum();
        let shipping = if subtotal > policy.free_shipping_threshold {
            Decimal::ZERO
        } else {
            policy.shipping_fee
        };
        let tax = subtotal * policy.tax_rate;
        let total = subtotal + shipping + tax;

        Self {
            subtotal: round_cents(subtotal),
            shipping: round_cents(shipping),
            tax: round_cents(tax),
            total: round_cents(total),
        }
    }

    /// Whether this order qualifies for free shipping.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use shopfront_core::ProductId;

    use super::*;

    fn line(id: i32, cents: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            id: ProductId::new(id),
            title: String::new(),
            price: Decimal::new(cents, 2),
            image: String::new(),
            slug: String::new(),
            quantity,
        }
    }

    fn totals(items: &[CartLineItem]) -> OrderTotals {
        OrderTotals::compute(items, &PricingPolicy::default())
    }

    #[test]
    fn test_totals_above_free_shipping_threshold() {
        let t = totals(&[line(1, 5000, 2), line(2, 7500, 1)]);

        assert_eq!(t.subtotal, Decimal::new(17500, 2));
        assert_eq!(t.shipping, Decimal::ZERO);
        assert_eq!(t.tax, Decimal::new(1400, 2));
        assert_eq!(t.total, Decimal::new(18900, 2));
        assert!(t.ships_free());
    }

    #[test]
    fn test_totals_at_threshold_pay_shipping() {
        let t = totals(&[line(1, 10000, 1)]);

        assert_eq!(t.subtotal, Decimal::new(10000, 2));
        assert_eq!(t.shipping, Decimal::new(999, 2));
        assert_eq!(t.tax, Decimal::new(800, 2));
        assert_eq!(t.total, Decimal::new(11799, 2));
    }

    #[test]
    fn test_totals_just_above_threshold() {
        let t = totals(&[line(1, 10001, 1)]);
        assert_eq!(t.shipping, Decimal::ZERO);
    }

    #[test]
    fn test_totals_empty_cart() {
        let t = totals(&[]);

        assert_eq!(t.subtotal, Decimal::ZERO);
        assert_eq!(t.shipping, Decimal::new(999, 2));
        assert_eq!(t.tax, Decimal::ZERO);
        assert_eq!(t.total, Decimal::new(999, 2));
    }

    #[test]
    fn test_total_rounds_from_unrounded_tax() {
        // subtotal 10.06 -> tax 0.8048 (rounds to 0.80), total 20.8548 -> 20.85
        let t = totals(&[line(1, 1006, 1)]);

        assert_eq!(t.tax, Decimal::new(80, 2));
        assert_eq!(t.total, Decimal::new(2085, 2));
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        // 0.3125 * 0.08 = 0.025 exactly
        let items = [CartLineItem {
            price: Decimal::new(3125, 4),
            ..line(1, 0, 1)
        }];
        let t = totals(&items);

        assert_eq!(t.tax, Decimal::new(3, 2));
        assert_eq!(t.subtotal, Decimal::new(31, 2));
    }
}
