//! Display formatting for prices, numbers, dates and short text.
//!
//! All functions are pure and locale-fixed to en-US, which is the only
//! locale the storefront renders.

use std::borrow::Cow;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::CurrencyCode;

/// Fraction digits kept by [`format_number`].
const MAX_NUMBER_FRACTION_DIGITS: u32 = 3;

/// Format an amount as US dollars (e.g., `$1,234.50`).
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format_currency(amount, CurrencyCode::USD)
}

/// Format an amount with the currency's symbol, thousands separators and
/// exactly two decimals. Negative amounts render as `-$3.00`.
#[must_use]
pub fn format_currency(amount: Decimal, currency: CurrencyCode) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    rounded.set_sign_positive(true);
    rounded.rescale(2);

    format!(
        "{sign}{}{}",
        currency.symbol(),
        group_decimal_string(&rounded.to_string())
    )
}

/// Format a number with thousands separators, keeping at most three
/// fraction digits and dropping trailing zeros.
#[must_use]
pub fn format_number(value: Decimal) -> String {
    let mut rounded = value
        .round_dp_with_strategy(MAX_NUMBER_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    rounded.set_sign_positive(true);

    format!("{sign}{}", group_decimal_string(&rounded.to_string()))
}

/// Format a date in long US form (e.g., `January 5, 2024`).
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Shorten text to `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }

    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    Cow::Owned(truncated)
}

/// Uppercase the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Turn a title into a URL slug.
///
/// Lowercases, drops everything that is not an ASCII word character or a
/// space, then replaces each run of spaces with a single `-`.
///
/// ```rust
/// use shopfront_core::format::slugify;
///
/// assert_eq!(slugify("Linen Shirt  (Blue)"), "linen-shirt-blue");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_space = false;

    for c in text.to_lowercase().chars() {
        if c == ' ' {
            if !in_space {
                slug.push('-');
                in_space = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
            in_space = false;
        }
    }

    slug
}

/// Parse a displayed price back into an amount (`"$1,234.56"` → `1234.56`).
///
/// Returns `None` when no number remains after stripping symbols.
#[must_use]
pub fn parse_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    Decimal::from_str(&cleaned).ok()
}

/// Insert thousands separators into the integer part of `"1234567.89"`.
fn group_decimal_string(digits: &str) -> String {
    let (integer, fraction) = digits
        .split_once('.')
        .map_or((digits, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 4);
    let len = integer.len();
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec("0")), "$0.00");
        assert_eq!(format_price(dec("9.99")), "$9.99");
        assert_eq!(format_price(dec("189")), "$189.00");
        assert_eq!(format_price(dec("1234.5")), "$1,234.50");
        assert_eq!(format_price(dec("1234567.891")), "$1,234,567.89");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(dec("-3")), "-$3.00");
        assert_eq!(format_price(dec("-0.001")), "$0.00");
    }

    #[test]
    fn test_format_price_rounds_half_up() {
        assert_eq!(format_price(dec("1.005")), "$1.01");
        assert_eq!(format_price(dec("2.004")), "$2.00");
    }

    #[test]
    fn test_format_currency_symbols() {
        assert_eq!(format_currency(dec("10"), CurrencyCode::EUR), "€10.00");
        assert_eq!(format_currency(dec("10"), CurrencyCode::CAD), "$10.00");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(dec("1234567.5")), "1,234,567.5");
        assert_eq!(format_number(dec("1000")), "1,000");
        assert_eq!(format_number(dec("0.12345")), "0.123");
        assert_eq!(format_number(dec("-1500.10")), "-1,500.1");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "January 5, 2024");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert!(matches!(truncate_text("short", 10), Cow::Borrowed(_)));
        assert_eq!(truncate_text("a longer sentence", 8), "a longer...");
        assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("email"), "Email");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("éclair"), "Éclair");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Classic Denim Jacket"), "classic-denim-jacket");
        assert_eq!(slugify("50% Off!  Today"), "50-off-today");
        assert_eq!(slugify("snake_case ok"), "snake_case-ok");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_price("-$3.00"), Some(dec("-3.00")));
        assert_eq!(parse_price("free"), None);
    }
}
