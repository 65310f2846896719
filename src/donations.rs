//! Donations
//!
//! A customer may round up an order for a charity. The donation is either a
//! fixed amount or a percentage of the subtotal before any coupon.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ids::TypedId,
    money::{self, Amount, PricingError},
};

/// NGO id
pub type NgoId = TypedId<Ngo>;

/// Percentage offered when the form is first shown.
pub const DEFAULT_PERCENTAGE: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Charity that accepts donations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ngo {
    /// NGO id
    pub id: NgoId,

    /// Name
    pub name: String,

    /// Cause it supports
    #[serde(default)]
    pub cause: String,

    /// Longer description
    #[serde(default)]
    pub description: String,
}

/// How the donation is specified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationType {
    /// A fixed amount
    Amount,

    /// A percentage of the subtotal
    #[default]
    Percentage,
}

/// Invalid donation input. The form keeps its previous value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DonationError {
    /// Percentage outside 0..=100.
    #[error("Donation percentage must be between 0 and 100, got {0}")]
    PercentageOutOfRange(Decimal),

    /// Negative fixed amount.
    #[error("Donation amount cannot be negative, got {0}")]
    NegativeAmount(Decimal),

    /// Amount does not fit in cents.
    #[error("Donation amount {0} is not a valid amount")]
    InvalidAmount(Decimal),
}

/// The donation value that goes with the order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DonationValue {
    /// Fixed amount
    Amount(Amount),

    /// Percent points of the subtotal
    Percentage(Decimal),
}

/// NGO and value chosen on the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonationSelection {
    /// Chosen NGO
    pub ngo_id: NgoId,

    /// Donation value
    pub value: DonationValue,
}

/// Donation form state.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationForm {
    ngo: Option<NgoId>,
    kind: DonationType,
    amount: Amount,
    percentage: Decimal,
}

impl Default for DonationForm {
    fn default() -> Self {
        Self {
            ngo: None,
            kind: DonationType::default(),
            amount: money::zero(),
            percentage: DEFAULT_PERCENTAGE,
        }
    }
}

impl DonationForm {
    /// A form with no NGO chosen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Chosen NGO.
    pub fn ngo(&self) -> Option<NgoId> {
        self.ngo
    }

    /// Donation type.
    pub fn kind(&self) -> DonationType {
        self.kind
    }

    /// Fixed amount field.
    pub fn fixed_amount(&self) -> Amount {
        self.amount
    }

    /// Percentage field, in percent points.
    pub fn percentage(&self) -> Decimal {
        self.percentage
    }

    /// Choose an NGO, or clear the choice. Clearing resets the form.
    pub fn set_ngo(&mut self, ngo: Option<NgoId>) {
        match ngo {
            Some(id) => self.ngo = Some(id),
            None => *self = Self::default(),
        }
    }

    /// Switch between a fixed amount and a percentage.
    pub fn set_kind(&mut self, kind: DonationType) {
        self.kind = kind;
    }

    /// Set the fixed amount, in dollars.
    ///
    /// # Errors
    ///
    /// Returns a [`DonationError`] for negative or unrepresentable amounts.
    pub fn set_fixed_amount(&mut self, dollars: Decimal) -> Result<(), DonationError> {
        if dollars.is_sign_negative() && !dollars.is_zero() {
            return Err(DonationError::NegativeAmount(dollars));
        }

        self.amount =
            money::from_decimal(dollars).map_err(|_err| DonationError::InvalidAmount(dollars))?;

        Ok(())
    }

    /// Set the percentage, in percent points.
    ///
    /// # Errors
    ///
    /// Returns [`DonationError::PercentageOutOfRange`] outside 0..=100.
    pub fn set_percentage(&mut self, points: Decimal) -> Result<(), DonationError> {
        if points < Decimal::ZERO || points > Decimal::ONE_HUNDRED {
            return Err(DonationError::PercentageOutOfRange(points));
        }

        self.percentage = points;

        Ok(())
    }

    /// The donation to send with the order, if an NGO is chosen.
    pub fn selection(&self) -> Option<DonationSelection> {
        let ngo_id = self.ngo?;

        let value = match self.kind {
            DonationType::Amount => DonationValue::Amount(self.amount),
            DonationType::Percentage => DonationValue::Percentage(self.percentage),
        };

        Some(DonationSelection { ngo_id, value })
    }

    /// Donation amount for a pre-coupon subtotal. Zero without an NGO.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the percentage cannot be applied.
    pub fn amount(&self, subtotal: &Amount) -> Result<Amount, PricingError> {
        match self.selection().map(|selection| selection.value) {
            None => Ok(money::zero()),
            Some(DonationValue::Amount(amount)) => Ok(amount),
            Some(DonationValue::Percentage(points)) => {
                money::percent_of(subtotal, money::percent_points(points))
            }
        }
    }
}
