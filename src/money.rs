//! Money
//!
//! Every amount in the storefront is a USD [`Money`] held in cents. The
//! backend speaks major-unit JSON numbers, so values are rounded to cents
//! (half away from zero) on the way in and written back out as numbers.

use std::str::FromStr;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso};
use thiserror::Error;

/// Storefront currency.
pub const CURRENCY: &iso::Currency = iso::USD;

/// A storefront amount.
pub type Amount = Money<'static, iso::Currency>;

/// Errors raised by money arithmetic.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A decimal amount does not fit in minor units.
    #[error("amount {0} cannot be represented in cents")]
    Unrepresentable(Decimal),

    /// Multiplying a unit price by a quantity overflowed.
    #[error("line total overflowed")]
    Overflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Zero dollars.
pub fn zero() -> Amount {
    Money::from_minor(0, CURRENCY)
}

/// Amount from a whole number of cents.
pub fn cents(minor: i64) -> Amount {
    Money::from_minor(minor, CURRENCY)
}

/// Amount from a major-unit decimal, rounded to cents.
///
/// # Errors
///
/// Returns [`PricingError::Unrepresentable`] when the value overflows `i64` cents.
pub fn from_decimal(major: Decimal) -> Result<Amount, PricingError> {
    let minor = major
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .ok_or(PricingError::Unrepresentable(major))?;

    Ok(cents(minor))
}

/// Major-unit decimal for an amount.
pub fn to_decimal(amount: &Amount) -> Decimal {
    Decimal::new(amount.to_minor_units(), 2)
}

/// Unit price multiplied by a quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in cents.
pub fn line_total(unit: &Amount, quantity: u32) -> Result<Amount, PricingError> {
    unit.to_minor_units()
        .checked_mul(i64::from(quantity))
        .map(|minor| Money::from_minor(minor, unit.currency()))
        .ok_or(PricingError::Overflow)
}

/// Sums a sequence of amounts, starting from zero.
///
/// # Errors
///
/// Returns [`PricingError::Money`] on a currency mismatch.
pub fn total_price(amounts: impl IntoIterator<Item = Amount>) -> Result<Amount, PricingError> {
    amounts
        .into_iter()
        .try_fold(zero(), |acc, amount| acc.add(amount))
        .map_err(PricingError::from)
}

/// The given share of an amount, rounded to cents.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the result cannot be represented.
pub fn percent_of(amount: &Amount, percent: Percentage) -> Result<Amount, PricingError> {
    let fraction = percent * Decimal::ONE;

    let Some(applied) = fraction.checked_mul(Decimal::from(amount.to_minor_units())) else {
        return Err(PricingError::PercentConversion);
    };

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let Some(minor) = rounded.to_i64() else {
        return Err(PricingError::PercentConversion);
    };

    Ok(Money::from_minor(minor, amount.currency()))
}

/// Fraction for a number of percent points, so `1.5` becomes 1.5%.
pub fn percent_points(points: Decimal) -> Percentage {
    Percentage::from(points / Decimal::ONE_HUNDRED)
}

/// Whether `balance` is at least `total`.
pub fn covers(balance: &Amount, total: &Amount) -> bool {
    balance.to_minor_units() >= total.to_minor_units()
}

/// `amount`, or zero when it is negative.
pub fn non_negative(amount: Amount) -> Amount {
    if amount.to_minor_units() < 0 {
        zero()
    } else {
        amount
    }
}

/// Serde adapters for the backend's numeric fields.
pub mod wire {
    use super::{Decimal, FromStr, from_decimal, to_decimal};

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// Numbers arrive as JSON integers, floats, or (on the menu endpoint) strings.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireNumber {
        Int(i64),
        Float(f64),
        Text(String),
    }

    impl WireNumber {
        fn into_decimal(self) -> Result<Decimal, rust_decimal::Error> {
            match self {
                WireNumber::Int(value) => Ok(Decimal::from(value)),
                WireNumber::Float(value) => Decimal::from_str(&value.to_string()),
                WireNumber::Text(value) => Decimal::from_str(value.trim()),
            }
        }
    }

    fn read_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        WireNumber::deserialize(deserializer)?
            .into_decimal()
            .map_err(D::Error::custom)
    }

    /// [`super::Amount`] fields.
    pub mod amount {
        use super::{Deserializer, Serializer, from_decimal, read_decimal, to_decimal};

        use serde::de::Error as _;

        use crate::money::Amount;

        /// Write an amount as a JSON number of dollars.
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S: Serializer>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
            rust_decimal::serde::float::serialize(&to_decimal(value), serializer)
        }

        /// Read a dollar amount from a number or numeric string.
        ///
        /// # Errors
        ///
        /// Fails on non-numeric input or amounts that overflow cents.
        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
            let value = read_decimal(deserializer)?;

            from_decimal(value).map_err(D::Error::custom)
        }
    }

    /// Optional [`super::Amount`] fields; `None` is written as `null`.
    pub mod option_amount {
        use super::{Deserialize, Deserializer, Serializer, WireNumber, from_decimal, to_decimal};

        use serde::de::Error as _;

        use crate::money::Amount;

        /// Write an optional amount as a JSON number or `null`.
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S: Serializer>(
            value: &Option<Amount>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            rust_decimal::serde::float_option::serialize(&value.as_ref().map(to_decimal), serializer)
        }

        /// Read an optional dollar amount.
        ///
        /// # Errors
        ///
        /// Fails on non-numeric input or amounts that overflow cents.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Amount>, D::Error> {
            Option::<WireNumber>::deserialize(deserializer)?
                .map(|number| {
                    number
                        .into_decimal()
                        .map_err(D::Error::custom)
                        .and_then(|value| from_decimal(value).map_err(D::Error::custom))
                })
                .transpose()
        }
    }

    /// Percent-point [`Decimal`] fields.
    pub mod decimal {
        use super::{Decimal, Deserializer, Serializer, read_decimal};

        /// Write a decimal as a JSON number.
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
            rust_decimal::serde::float::serialize(value, serializer)
        }

        /// Read a decimal from a number or numeric string.
        ///
        /// # Errors
        ///
        /// Fails on non-numeric input.
        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
            read_decimal(deserializer)
        }
    }

    /// Optional percent-point [`Decimal`] fields; `None` is written as `null`.
    pub mod option_decimal {
        use super::{Decimal, Deserialize, Deserializer, Serializer, WireNumber};

        use serde::de::Error as _;

        /// Write an optional decimal as a JSON number or `null`.
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S: Serializer>(
            value: &Option<Decimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            rust_decimal::serde::float_option::serialize(value, serializer)
        }

        /// Read an optional decimal.
        ///
        /// # Errors
        ///
        /// Fails on non-numeric input.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Decimal>, D::Error> {
            Option::<WireNumber>::deserialize(deserializer)?
                .map(|number| number.into_decimal().map_err(D::Error::custom))
                .transpose()
        }
    }
}
