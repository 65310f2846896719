//! Checkout
//!
//! [`CheckoutState`] is the whole checkout page: the catalog the cart is
//! joined against, the cart, the customer's payment methods, and the coupon
//! and donation forms. Totals are derived from it on demand.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    bundles::Bundle,
    cart::{Cart, CartEntry},
    coupons::{CouponFlow, CouponListing},
    donations::{DonationForm, DonationValue, Ngo, NgoId},
    money::{self, Amount, PricingError, wire},
    payments::{self, PaymentMethod, PaymentMethodId},
    products::{Product, Supplier, SupplierDirectory},
};

/// Errors that stop payment before any request is made.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// No payment method is selected.
    #[error("Please select a payment method.")]
    NoPaymentMethod,

    /// The selected method's balance is below the final total.
    #[error("Insufficient funds for this transaction.")]
    InsufficientFunds,

    /// Totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Derived order totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// Sum of cart lines
    pub subtotal: Amount,

    /// Coupon discount shown to the customer
    pub discount: Amount,

    /// Subtotal after the coupon
    pub effective: Amount,

    /// Donation, computed from the subtotal before the coupon
    pub donation: Amount,

    /// Amount charged
    pub final_total: Amount,
}

/// Catalog records the checkout page loads on mount.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Supplier names
    pub suppliers: SupplierDirectory,

    /// Products
    pub products: Vec<Product>,

    /// Bundles
    pub bundles: Vec<Bundle>,

    /// Charities
    pub ngos: Vec<Ngo>,

    /// Coupons on offer
    pub coupons: Vec<CouponListing>,
}

impl Catalog {
    /// Assemble a catalog from the mount fetches.
    pub fn new(
        suppliers: &[Supplier],
        products: Vec<Product>,
        bundles: Vec<Bundle>,
        ngos: Vec<Ngo>,
        coupons: Vec<CouponListing>,
    ) -> Self {
        Self {
            suppliers: SupplierDirectory::new(suppliers),
            products,
            bundles,
            ngos,
            coupons,
        }
    }

    /// Whether there is anything to join cart entries against.
    pub fn can_join_cart(&self) -> bool {
        !self.products.is_empty() || !self.bundles.is_empty()
    }
}

/// Response from `GET /customers/{id}/customer_showing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CustomerShowing {
    /// Showing id
    pub id: u64,
}

/// Body for `POST /deliveries`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRequest {
    /// Showing the order is delivered to, `0` when unknown
    pub customer_showing_id: u64,

    /// Card to charge
    pub payment_method_id: PaymentMethodId,

    /// Coupon code
    pub coupon_code: Option<String>,

    /// Puzzle token
    pub puzzle_token: Option<String>,

    /// Puzzle answer
    pub puzzle_answer: Option<String>,

    /// Skip puzzle verification
    pub skip_puzzle: bool,

    /// Charity
    pub ngo_id: Option<NgoId>,

    /// Fixed donation
    #[serde(with = "wire::option_amount")]
    pub donation_amount: Option<Amount>,

    /// Donation percent points
    #[serde(with = "wire::option_decimal")]
    pub donation_percentage: Option<Decimal>,
}

/// Checkout page state.
#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    catalog: Catalog,
    entries: Vec<CartEntry>,
    cart: Cart,
    payment_methods: Vec<PaymentMethod>,
    selected: Option<PaymentMethodId>,

    /// Coupon form
    pub coupon: CouponFlow,

    /// Donation form
    pub donation: DonationForm,
}

impl CheckoutState {
    /// A page with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loaded catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Replace the catalog and re-join the cart against it.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.cart = Cart::reconcile(&self.entries, &self.catalog.products, &self.catalog.bundles);
    }

    /// Joined cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Replace the cart with freshly fetched entries.
    pub fn set_cart_entries(&mut self, entries: Vec<CartEntry>) {
        self.entries = entries;
        self.cart = Cart::reconcile(&self.entries, &self.catalog.products, &self.catalog.bundles);
    }

    /// Empty the local cart after an order is placed.
    pub fn clear_cart(&mut self) {
        self.entries.clear();
        self.cart.clear();
    }

    /// Loaded payment methods.
    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    /// Replace the payment methods, keeping the selection when possible.
    pub fn set_payment_methods(&mut self, methods: Vec<PaymentMethod>) {
        self.selected = payments::reselect(&methods, self.selected);
        self.payment_methods = methods;
    }

    /// Select a payment method. Returns `false` if it is not loaded.
    pub fn select_payment_method(&mut self, id: PaymentMethodId) -> bool {
        let known = self.payment_methods.iter().any(|method| method.id == id);

        if known {
            self.selected = Some(id);
        }

        known
    }

    /// Selected payment method.
    pub fn selected_payment_method(&self) -> Option<&PaymentMethod> {
        self.selected
            .and_then(|id| self.payment_methods.iter().find(|method| method.id == id))
    }

    /// Derive the order totals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the money arithmetic fails.
    pub fn totals(&self) -> Result<Totals, PricingError> {
        let subtotal = self.cart.subtotal()?;
        let effective = self
            .coupon
            .applied()
            .map_or(subtotal, |coupon| coupon.new_total);
        let discount = money::non_negative(subtotal.sub(effective)?);
        let donation = self.donation.amount(&subtotal)?;
        let final_total = effective.add(donation)?;

        Ok(Totals {
            subtotal,
            discount,
            effective,
            donation,
            final_total,
        })
    }

    /// Check the payment preconditions.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when no method is selected or it cannot
    /// cover the final total.
    pub fn ready_to_pay(&self) -> Result<PaymentMethodId, CheckoutError> {
        let method = self
            .selected_payment_method()
            .ok_or(CheckoutError::NoPaymentMethod)?;
        let totals = self.totals()?;

        if !method.covers(&totals.final_total) {
            return Err(CheckoutError::InsufficientFunds);
        }

        Ok(method.id)
    }

    /// Build the order body.
    pub fn delivery_request(
        &self,
        customer_showing_id: u64,
        payment_method_id: PaymentMethodId,
    ) -> DeliveryRequest {
        let applied = self.coupon.applied();

        let coupon_code = applied.map(|coupon| coupon.code.clone()).or_else(|| {
            let raw = self.coupon.code();
            (!raw.trim().is_empty()).then(|| raw.to_string())
        });

        let (puzzle_token, puzzle_answer) = match (applied, self.coupon.challenge()) {
            (None, Some(challenge)) => {
                let answer = self.coupon.answer();
                (
                    Some(challenge.token.clone()),
                    (!answer.is_empty()).then(|| answer.to_string()),
                )
            }
            _ => (None, None),
        };

        let donation = self.donation.selection();
        let (donation_amount, donation_percentage) = match donation.map(|d| d.value) {
            Some(DonationValue::Amount(amount)) => (Some(amount), None),
            Some(DonationValue::Percentage(points)) => (None, Some(points)),
            None => (None, None),
        };

        DeliveryRequest {
            customer_showing_id,
            payment_method_id,
            coupon_code,
            puzzle_token,
            puzzle_answer,
            skip_puzzle: applied.is_some() || self.coupon.skip_puzzle(),
            ngo_id: donation.map(|d| d.ngo_id),
            donation_amount,
            donation_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        cart::CartItemId,
        coupons::{AppliedCoupon, PuzzleChallenge, PuzzlePrompt},
        donations::DonationType,
        money::cents,
        payments::tests::method,
        products::{ProductId, tests::product},
    };

    use super::*;

    fn state_with_cart(price_cents: i64, quantity: u32) -> CheckoutState {
        let mut state = CheckoutState::new();
        state.set_catalog(Catalog {
            products: vec![product(1, price_cents)],
            ..Catalog::default()
        });
        state.set_cart_entries(vec![CartEntry {
            id: CartItemId::new(1),
            product_id: Some(ProductId::new(1)),
            bundle_id: None,
            quantity,
        }]);
        state
    }

    #[test]
    fn cart_joins_once_catalog_arrives() -> TestResult {
        let mut state = CheckoutState::new();
        state.set_cart_entries(vec![CartEntry {
            id: CartItemId::new(1),
            product_id: Some(ProductId::new(1)),
            bundle_id: None,
            quantity: 2,
        }]);

        assert!(state.cart().is_empty());

        state.set_catalog(Catalog {
            products: vec![product(1, 300)],
            ..Catalog::default()
        });

        assert_eq!(state.totals()?.subtotal, cents(600));

        Ok(())
    }

    #[test]
    fn discount_is_the_coupon_saving() -> TestResult {
        let mut state = state_with_cart(1_000, 1);
        state.coupon.set_code("SAVE10");
        state.coupon.applied_confirmed(AppliedCoupon {
            code: "SAVE10".to_string(),
            discount_percent: Decimal::TEN,
            new_total: cents(900),
        });

        let totals = state.totals()?;

        assert_eq!(totals.discount, cents(100));
        assert_eq!(totals.final_total, cents(900));

        Ok(())
    }

    #[test]
    fn payment_requires_a_selected_method() {
        let state = state_with_cart(1_000, 1);

        assert_eq!(state.ready_to_pay(), Err(CheckoutError::NoPaymentMethod));
    }

    #[test]
    fn payment_requires_enough_balance() -> TestResult {
        let mut state = state_with_cart(1_000, 1);
        state.set_payment_methods(vec![method(1, 999, true)]);

        assert_eq!(state.ready_to_pay(), Err(CheckoutError::InsufficientFunds));

        state.set_payment_methods(vec![method(1, 1_000, true)]);

        assert_eq!(state.ready_to_pay()?, PaymentMethodId::new(1));

        Ok(())
    }

    #[test]
    fn selecting_an_unknown_method_is_ignored() {
        let mut state = state_with_cart(1_000, 1);
        state.set_payment_methods(vec![method(1, 0, false), method(2, 0, false)]);

        assert!(state.select_payment_method(PaymentMethodId::new(2)));
        assert!(!state.select_payment_method(PaymentMethodId::new(5)));
        assert_eq!(
            state.selected_payment_method().map(|m| m.id),
            Some(PaymentMethodId::new(2))
        );
    }

    #[test]
    fn order_body_with_applied_coupon_skips_puzzle() -> TestResult {
        let mut state = state_with_cart(1_000, 1);
        state.coupon.set_code("SAVE10");
        state.coupon.applied_confirmed(AppliedCoupon {
            code: "SAVE10".to_string(),
            discount_percent: Decimal::TEN,
            new_total: cents(900),
        });
        state.donation.set_ngo(Some(NgoId::new(3)));
        state.donation.set_kind(DonationType::Amount);
        state.donation.set_fixed_amount(Decimal::new(2, 0))?;

        let body = serde_json::to_value(state.delivery_request(7, PaymentMethodId::new(1)))?;

        assert_eq!(
            body,
            serde_json::json!({
                "customer_showing_id": 7,
                "payment_method_id": 1,
                "coupon_code": "SAVE10",
                "puzzle_token": null,
                "puzzle_answer": null,
                "skip_puzzle": true,
                "ngo_id": 3,
                "donation_amount": 2.0,
                "donation_percentage": null
            })
        );

        Ok(())
    }

    #[test]
    fn order_body_carries_pending_puzzle() {
        let mut state = state_with_cart(1_000, 1);
        state.coupon.set_code("RIDDLE");
        state.coupon.puzzle_issued(PuzzleChallenge {
            token: "tok".to_string(),
            prompt: PuzzlePrompt::Question("?".to_string()),
        });
        state.coupon.set_answer("42");

        let body = state.delivery_request(0, PaymentMethodId::new(1));

        assert_eq!(body.coupon_code.as_deref(), Some("RIDDLE"));
        assert_eq!(body.puzzle_token.as_deref(), Some("tok"));
        assert_eq!(body.puzzle_answer.as_deref(), Some("42"));
        assert!(!body.skip_puzzle);
        assert_eq!(body.ngo_id, None);
    }

    #[test]
    fn order_body_without_coupon_text_sends_null() {
        let state = state_with_cart(1_000, 1);

        let body = state.delivery_request(0, PaymentMethodId::new(1));

        assert_eq!(body.coupon_code, None);
        assert_eq!(body.donation_percentage, None);
    }

    #[test]
    fn clear_cart_empties_totals() -> TestResult {
        let mut state = state_with_cart(1_000, 1);

        state.clear_cart();

        assert_eq!(state.totals()?.subtotal, cents(0));

        Ok(())
    }
}
