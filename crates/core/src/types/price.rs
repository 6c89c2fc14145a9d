//! Fixed-point prices.
//!
//! Prices are decimal amounts with two fractional digits. Product prices are
//! additionally bounded by the catalog column (`NUMERIC(5, 2)`), which
//! [`Price::parse_catalog`] enforces for form input.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a catalog [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("Enter a number.")]
    NotANumber,
    /// The amount is negative.
    #[error("Ensure this value is greater than or equal to 0.")]
    Negative,
    /// More than two digits after the decimal point.
    #[error("Ensure that there are no more than {max} decimal places.")]
    TooManyDecimalPlaces {
        /// Maximum allowed fractional digits.
        max: u32,
    },
    /// Too many digits in total.
    #[error("Ensure that there are no more than {max} digits in total.")]
    TooManyDigits {
        /// Maximum allowed digits.
        max: u32,
    },
}

/// A monetary amount with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Number of fractional digits carried by every price.
    pub const SCALE: u32 = 2;

    /// Maximum total digits of a catalog price.
    pub const CATALOG_MAX_DIGITS: u32 = 5;

    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount, rounding to two places.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let mut amount = amount.round_dp(Self::SCALE);
        amount.rescale(Self::SCALE);
        Self(amount)
    }

    /// Build a price from a whole number of cents.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_cents(cents: i64) -> Self {
        let magnitude = cents.unsigned_abs();
        Self(Decimal::from_parts(
            magnitude as u32,
            (magnitude >> 32) as u32,
            0,
            cents < 0,
            Self::SCALE,
        ))
    }

    /// Parse a price entered for a catalog product.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is not a decimal number
    /// - Is negative
    /// - Has more than two decimal places
    /// - Has more than five digits in total
    pub fn parse_catalog(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::NotANumber)?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let normalized = amount.normalize();
        if normalized.scale() > Self::SCALE {
            return Err(PriceError::TooManyDecimalPlaces { max: Self::SCALE });
        }

        let integer_digits = Self::CATALOG_MAX_DIGITS - Self::SCALE;
        if normalized.trunc() >= Decimal::from(10_i64.pow(integer_digits)) {
            return Err(PriceError::TooManyDigits {
                max: Self::CATALOG_MAX_DIGITS,
            });
        }

        Ok(Self::new(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.0 * Decimal::from(quantity))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = self.0;
        amount.rescale(Self::SCALE);
        write!(f, "{amount}")
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_accepts_two_places() {
        let price = Price::parse_catalog("10.5").unwrap();
        assert_eq!(price, Price::from_cents(1050));
        assert_eq!(price.to_string(), "10.50");
    }

    #[test]
    fn test_parse_catalog_trailing_zeros_are_not_extra_places() {
        assert_eq!(Price::parse_catalog("4.500").unwrap(), Price::from_cents(450));
    }

    #[test]
    fn test_parse_catalog_rejects_bad_input() {
        assert_eq!(Price::parse_catalog("ten"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse_catalog("-1"), Err(PriceError::Negative));
        assert_eq!(
            Price::parse_catalog("1.999"),
            Err(PriceError::TooManyDecimalPlaces { max: 2 })
        );
        assert_eq!(
            Price::parse_catalog("1000"),
            Err(PriceError::TooManyDigits { max: 5 })
        );
        assert!(Price::parse_catalog("999.99").is_ok());
    }

    #[test]
    fn test_times_and_sum() {
        let lines = [Price::from_cents(1000).times(2), Price::from_cents(500).times(1)];
        let subtotal: Price = lines.into_iter().sum();
        assert_eq!(subtotal, Price::from_cents(2500));
        assert_eq!((subtotal + Price::from_cents(5000)).to_string(), "75.00");
    }

    #[test]
    fn test_from_cents_keeps_sign_and_scale() {
        assert_eq!(Price::from_cents(1999).to_string(), "19.99");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
        assert_eq!(Price::from_cents(0), Price::ZERO);
        assert_eq!(Price::from_cents(-150).to_string(), "-1.50");
        assert_eq!(Price::from_cents(-150).amount(), Decimal::new(-150, 2));
        assert_eq!(
            Price::from_cents(i64::MAX).amount(),
            Decimal::new(i64::MAX, 2)
        );
    }

    #[test]
    fn test_from_cents_is_usable_in_consts() {
        const FEE: Price = Price::from_cents(5000);
        assert_eq!(FEE.to_string(), "50.00");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_cents(1999)).unwrap();
        assert_eq!(json, "\"19.99\"");
    }
}
