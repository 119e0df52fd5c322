//! Simulated checkout.
//!
//! Validates the shipping/payment form, waits a fixed delay in place of a
//! payment round trip, and returns an order confirmation. Nothing is
//! charged and nothing is stored; the caller clears the cart on success.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use shopfront_core::Email;
use thiserror::Error;
use tracing::{info, instrument};

use crate::cart::{CartLineItem, CartSnapshot, OrderTotals};

/// Delay standing in for the payment round trip.
pub const DEFAULT_CHECKOUT_DELAY: Duration = Duration::from_secs(2);

/// Digits, spaces, dashes and parentheses, optionally led by `+`.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("Invalid regex"));

/// Fields that must be non-blank, with their display labels.
const REQUIRED_FIELDS: &[(&str, &str)] = &[
    ("email", "Email"),
    ("first_name", "First name"),
    ("last_name", "Last name"),
    ("address", "Address"),
    ("city", "City"),
    ("state", "State"),
    ("zip_code", "ZIP code"),
    ("phone", "Phone"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Paypal,
    Apple,
    Google,
}

/// Checkout form as submitted by the client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub name_on_card: String,
    pub billing_address: String,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_zip_code: String,
    pub same_as_shipping: bool,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: "US".to_string(),
            phone: String::new(),
            payment_method: PaymentMethod::default(),
            card_number: String::new(),
            expiry_date: String::new(),
            cvv: String::new(),
            name_on_card: String::new(),
            billing_address: String::new(),
            billing_city: String::new(),
            billing_state: String::new(),
            billing_zip_code: String::new(),
            same_as_shipping: true,
        }
    }
}

impl fmt::Debug for CheckoutForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutForm")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("city", &self.city)
            .field("state", &self.state)
            .field("country", &self.country)
            .field("payment_method", &self.payment_method)
            .field("card_number", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .field("same_as_shipping", &self.same_as_shipping)
            .finish_non_exhaustive()
    }
}

impl CheckoutForm {
    fn field(&self, name: &str) -> &str {
        match name {
            "email" => &self.email,
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "zip_code" => &self.zip_code,
            "phone" => &self.phone,
            _ => "",
        }
    }

    /// Check every field, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns the field-to-message map when any field is invalid.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for &(name, label) in REQUIRED_FIELDS {
            if self.field(name).trim().is_empty() {
                errors.insert(name, format!("{label} is required"));
            }
        }

        let email = self.email.trim();
        if !email.is_empty() && Email::parse(email).is_err() {
            errors.insert("email", "Please enter a valid email address");
        }

        let phone = self.phone.trim();
        if !phone.is_empty() && !PHONE_RE.is_match(phone) {
            errors.insert("phone", "Please enter a valid phone number");
        }

        if self.payment_method == PaymentMethod::Card {
            let card_fields = [
                ("card_number", &self.card_number, "Card number is required"),
                ("expiry_date", &self.expiry_date, "Expiry date is required"),
                ("cvv", &self.cvv, "CVV is required"),
                ("name_on_card", &self.name_on_card, "Name on card is required"),
            ];
            for (name, value, message) in card_fields {
                if value.trim().is_empty() {
                    errors.insert(name, message);
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Field name to message, one entry per invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().copied().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Why an order was not placed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("{0}")]
    Invalid(ValidationErrors),
}

/// Receipt for a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub placed_at: DateTime<Utc>,
    pub email: String,
    pub items: Vec<CartLineItem>,
    pub totals: OrderTotals,
}

/// Places simulated orders.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutService {
    delay: Duration,
}

impl Default for CheckoutService {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKOUT_DELAY)
    }
}

impl CheckoutService {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Validate and "submit" an order for the given cart contents.
    ///
    /// The delay always runs to completion; there is no failure path after
    /// validation passes.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart and
    /// [`CheckoutError::Invalid`] when the form fails validation.
    #[instrument(skip_all, fields(lines = cart.items.len()))]
    pub async fn place_order(
        &self,
        cart: &CartSnapshot,
        form: &CheckoutForm,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if cart.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        form.validate().map_err(CheckoutError::Invalid)?;

        tokio::time::sleep(self.delay).await;

        let placed_at = Utc::now();
        let order_id = format!("ORD-{}", placed_at.timestamp_millis());
        info!(%order_id, total = %cart.totals.total, "Order placed");

        Ok(OrderConfirmation {
            order_id,
            placed_at,
            email: form.email.trim().to_owned(),
            items: cart.items.clone(),
            totals: cart.totals,
        })
    }
}
