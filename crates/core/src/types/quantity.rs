//! Line item quantity type.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The amount is zero or negative.
    #[error("quantity must be at least 1 (got {0})")]
    NotPositive(i64),
    /// The amount does not fit in a quantity.
    #[error("quantity must be at most {max} (got {got})", max = u32::MAX)]
    TooLarge {
        /// The rejected amount.
        got: i64,
    },
}

/// A line item quantity.
///
/// Always a positive integer. Zero and negative amounts cannot be
/// represented, so they can never be stored in a cart.
///
/// ## Examples
///
/// ```
/// use rocketshoes_core::Quantity;
///
/// assert_eq!(Quantity::try_from(3).unwrap().get(), 3);
/// assert!(Quantity::try_from(0).is_err());
/// assert!(Quantity::try_from(-2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Returns the quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns the quantity plus one, or `None` on overflow.
    #[must_use]
    pub fn incremented(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(amount: i64) -> Result<Self, Self::Error> {
        if amount <= 0 {
            return Err(QuantityError::NotPositive(amount));
        }
        let value = u32::try_from(amount).map_err(|_| QuantityError::TooLarge { got: amount })?;
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(QuantityError::NotPositive(amount))
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> Self {
        Self::from(quantity.get())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(Quantity::try_from(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::try_from(-5), Err(QuantityError::NotPositive(-5)));
    }

    #[test]
    fn test_rejects_too_large() {
        let too_big = i64::from(u32::MAX) + 1;
        assert!(matches!(
            Quantity::try_from(too_big),
            Err(QuantityError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_incremented() {
        let two = Quantity::ONE.incremented().unwrap();
        assert_eq!(two.get(), 2);
        assert!(Quantity::try_from(i64::from(u32::MAX))
            .unwrap()
            .incremented()
            .is_none());
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("4").unwrap().get(), 4);
    }

    #[test]
    fn test_serializes_as_number() {
        let q = Quantity::try_from(3).unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "3");
    }
}
