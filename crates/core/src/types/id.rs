//! Product identifier.
//!
//! Cart line items and catalog records are keyed by [`ProductId`]. It is a
//! newtype over `i32` so a product id cannot be confused with a quantity or
//! a page number.

use core::fmt;
use core::num::ParseIntError;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog product.
///
/// Serializes transparently as a JSON number, matching the static catalog
/// and the persisted cart layout.
///
/// ```rust
/// use shopfront_core::ProductId;
///
/// let id: ProductId = "42".parse().unwrap();
/// assert_eq!(id, ProductId::new(42));
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i32);

impl ProductId {
    /// Create a new ID from an i32 value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}
