//! Payment Methods

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    ids::TypedId,
    money::{self, Amount, wire},
};

/// Payment method id
pub type PaymentMethodId = TypedId<PaymentMethod>;

/// A stored card with a prepaid balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Payment method id
    pub id: PaymentMethodId,

    /// Card number, as digits
    #[serde(deserialize_with = "card_number")]
    pub card_number: String,

    /// Expiry month, 1 to 12
    pub expiration_month: u8,

    /// Expiry year
    pub expiration_year: u16,

    /// Prepaid balance
    #[serde(default, with = "wire::option_amount")]
    pub balance: Option<Amount>,

    /// Whether this is the customer's default card
    #[serde(default)]
    pub is_default: bool,

    /// Billing address
    #[serde(default)]
    pub billing_address: Option<String>,
}

/// Card numbers come back as strings or bare JSON numbers.
fn card_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Digits {
        Number(u64),
        Text(String),
    }

    Ok(match Digits::deserialize(deserializer)? {
        Digits::Number(number) => number.to_string(),
        Digits::Text(text) => text,
    })
}

impl PaymentMethod {
    /// Balance, treating a missing balance as zero.
    pub fn balance(&self) -> Amount {
        self.balance.unwrap_or_else(money::zero)
    }

    /// Last four digits, zero padded.
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().collect();
        let tail: String = digits.iter().skip(digits.len().saturating_sub(4)).collect();

        format!("{tail:0>4}")
    }

    /// Expiry as `MM/YYYY`.
    pub fn expiry(&self) -> String {
        format!("{:02}/{}", self.expiration_month, self.expiration_year)
    }

    /// Whether the balance covers `total`.
    pub fn covers(&self, total: &Amount) -> bool {
        money::covers(&self.balance(), total)
    }
}

/// The method to select after payment methods are (re)loaded: the current
/// choice if it still exists, else the default method, else the first.
pub fn reselect(
    methods: &[PaymentMethod],
    current: Option<PaymentMethodId>,
) -> Option<PaymentMethodId> {
    current
        .filter(|id| methods.iter().any(|method| method.id == *id))
        .or_else(|| {
            methods
                .iter()
                .find(|method| method.is_default)
                .or_else(|| methods.first())
                .map(|method| method.id)
        })
}

/// Body for `POST /payment-methods/{id}/add-funds`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AddFundsRequest {
    /// Amount to add
    #[serde(with = "wire::amount")]
    pub amount: Amount,
}

/// Response from `POST /payment-methods/{id}/add-funds`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AddFundsResponse {
    /// Balance after the top-up
    #[serde(with = "wire::amount")]
    pub new_balance: Amount,
}
