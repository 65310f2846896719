//! Checkout page.

use std::io;

use tracing::{debug, error, info, warn};

use concession::{
    cart::{CartItemId, QuantityChange},
    checkout::{Catalog, CheckoutState},
    coupons::CouponStep,
    money::Amount,
    payments::PaymentMethodId,
    receipt,
};

use crate::{
    context::AppContext,
    pages::{Feedback, PageError},
    prompt::Prompt,
    session::Session,
};

/// Cart, coupon, donation and payment orchestration for one customer.
pub struct CheckoutPage {
    ctx: AppContext,
    session: Session,
    state: CheckoutState,
    feedback: Feedback,
}

impl CheckoutPage {
    /// Empty page for `session`; nothing is loaded until [`Self::mount`].
    #[must_use]
    pub fn new(ctx: AppContext, session: Session) -> Self {
        Self {
            ctx,
            session,
            state: CheckoutState::new(),
            feedback: Feedback::default(),
        }
    }

    /// Cart, catalog, coupon, donation and payment state.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Form state the user edits directly: coupon text, skip flag, puzzle
    /// answer and the donation form.
    pub fn state_mut(&mut self) -> &mut CheckoutState {
        &mut self.state
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut Feedback {
        &mut self.feedback
    }

    /// Load the catalog, then the cart and payment methods once there are
    /// products or bundles to join the cart against.
    pub async fn mount(&mut self) {
        self.feedback.clear_banner();

        let catalog = &self.ctx.catalog;
        let (suppliers, products, bundles, ngos, coupons) = tokio::join!(
            catalog.suppliers(),
            catalog.menu_products(),
            self.ctx.bundles.list(false),
            catalog.ngos(),
            catalog.coupons(),
        );

        let suppliers = self
            .feedback
            .record(suppliers.map_err(|error| PageError::api(error, "Could not load supplier data.")))
            .unwrap_or_default();
        let products = self
            .feedback
            .record(products.map_err(|error| PageError::api(error, "Could not load product data.")))
            .unwrap_or_default();
        let bundles = self
            .feedback
            .record(bundles.map_err(|error| PageError::api(error, "Could not load bundle data.")))
            .unwrap_or_default();
        let ngos = ngos
            .inspect_err(|error| error!(%error, "Failed to fetch NGOs"))
            .unwrap_or_default();
        let coupons = coupons
            .inspect_err(|error| debug!(%error, "coupon listing unavailable"))
            .unwrap_or_default();

        self.state
            .set_catalog(Catalog::new(&suppliers, products, bundles, ngos, coupons));

        info!(
            products = self.state.catalog().products.len(),
            bundles = self.state.catalog().bundles.len(),
            "checkout catalog loaded"
        );

        if self.state.catalog().can_join_cart() {
            self.reload_cart().await;
            self.reload_payment_methods().await;
        } else {
            warn!("catalog is empty, cart and payment methods not loaded");
        }
    }

    /// Re-fetch the cart and join it against the catalog.
    pub async fn reload_cart(&mut self) {
        let result = self
            .ctx
            .carts
            .items(self.session)
            .await
            .map_err(|error| PageError::api(error, "Could not load shopping cart items."));

        if let Some(entries) = self.feedback.record(result) {
            self.state.set_cart_entries(entries);
        }
    }

    /// Re-fetch payment methods, keeping the selection when it still exists.
    pub async fn reload_payment_methods(&mut self) {
        let result = self
            .ctx
            .payments
            .methods(self.session)
            .await
            .map_err(|error| PageError::api(error, "Could not load payment methods."));

        if let Some(methods) = self.feedback.record(result) {
            self.state.set_payment_methods(methods);
        }
    }

    /// Apply a quantity picked for a cart line. Anything below one removes
    /// the line after the user confirms; a quantity too large for a line is
    /// rejected without a request.
    pub async fn change_quantity(&mut self, item: CartItemId, requested: i64, prompt: &dyn Prompt) {
        self.feedback.clear_banner();

        let change = match QuantityChange::for_request(requested) {
            Ok(change) => change,
            Err(error) => {
                self.feedback.record::<()>(Err(error.into()));

                return;
            }
        };

        let result = match change {
            QuantityChange::Remove => {
                if !prompt.confirm("Are you sure you want to remove this item?") {
                    debug!(%item, "removal declined");

                    return;
                }

                self.ctx
                    .carts
                    .remove(item)
                    .await
                    .map_err(|error| PageError::api(error, "Failed to remove item."))
            }
            QuantityChange::Update(quantity) => self
                .ctx
                .carts
                .set_quantity(item, quantity)
                .await
                .map_err(|error| PageError::api(error, "Failed to update quantity.")),
        };

        self.feedback.record(result);
        self.reload_cart().await;
    }

    /// Drop a cart line.
    pub async fn remove_item(&mut self, item: CartItemId) {
        self.feedback.clear_banner();

        let result = self
            .ctx
            .carts
            .remove(item)
            .await
            .map_err(|error| PageError::api(error, "Failed to remove item."));

        self.feedback.record(result);
        self.reload_cart().await;
    }

    /// Select the card to charge.
    pub fn select_payment_method(&mut self, id: PaymentMethodId) {
        self.feedback.clear_banner();

        if !self.state.select_payment_method(id) {
            self.feedback
                .record::<()>(Err(PageError::UnknownPaymentMethod(id)));
        }
    }

    /// Top up a card and reload the payment methods.
    pub async fn add_funds(&mut self, method: PaymentMethodId, amount: Amount) {
        self.feedback.clear_banner();

        let result = self
            .ctx
            .payments
            .add_funds(method, amount)
            .await
            .map_err(|error| PageError::api(error, "Failed to add funds."));

        if let Some(balance) = self.feedback.record(result) {
            self.feedback
                .notify(format!("Successfully added {amount}. New balance: {balance}"));
        }

        self.reload_payment_methods().await;
    }

    /// Apply the typed coupon code: ask for a puzzle, or apply it straight
    /// away when the skip flag is set.
    pub async fn apply_coupon(&mut self) {
        self.feedback.clear_banner();

        let result = self.try_apply_coupon().await;

        self.feedback.record(result);
    }

    async fn try_apply_coupon(&mut self) -> Result<(), PageError> {
        let subtotal = self.state.totals()?.subtotal;

        match self.state.coupon.begin_apply(subtotal)? {
            CouponStep::RequestPuzzle { code } => {
                let challenge = self
                    .ctx
                    .coupons
                    .puzzle(&code)
                    .await
                    .map_err(|error| PageError::api(error, "Failed to fetch puzzle"))?;

                info!(code, "puzzle issued");

                self.state.coupon.puzzle_issued(challenge);
            }
            CouponStep::ApplyDirect(request) => {
                let applied = self
                    .ctx
                    .coupons
                    .apply(&request)
                    .await
                    .map_err(|error| PageError::api(error, "Invalid coupon"))?;

                self.state.coupon.applied_confirmed(applied);
            }
        }

        Ok(())
    }

    /// Send the typed answer for the pending puzzle. A wrong answer leaves
    /// the puzzle open.
    pub async fn submit_puzzle_answer(&mut self) {
        self.feedback.clear_banner();

        let result = self.try_submit_puzzle_answer().await;

        self.feedback.record(result);
    }

    async fn try_submit_puzzle_answer(&mut self) -> Result<(), PageError> {
        let subtotal = self.state.totals()?.subtotal;
        let request = self.state.coupon.submission(subtotal)?;

        let applied = self
            .ctx
            .coupons
            .apply(&request)
            .await
            .map_err(|error| PageError::api(error, "Failed to verify puzzle"))?;

        self.state.coupon.applied_confirmed(applied);

        Ok(())
    }

    /// Close the puzzle without answering.
    pub fn dismiss_puzzle(&mut self) {
        self.state.coupon.dismiss_puzzle();
    }

    /// Drop the applied coupon.
    pub fn remove_coupon(&mut self) {
        self.state.coupon.remove();
    }

    /// Pay with the selected card and place the order.
    pub async fn checkout(&mut self) {
        self.feedback.clear_banner();

        let result = self.try_checkout().await;

        if self.feedback.record(result).is_some() {
            self.feedback.notify("Order placed successfully!");
        }
    }

    async fn try_checkout(&mut self) -> Result<(), PageError> {
        let payment_method = self.state.ready_to_pay().inspect_err(|error| {
            warn!(%error, "checkout blocked");
        })?;

        let showing_id = match self.ctx.orders.customer_showing(self.session).await {
            Ok(showing) => showing.id,
            Err(error) => {
                error!(%error, "Failed to fetch showings.");

                0
            }
        };

        let delivery = self.state.delivery_request(showing_id, payment_method);

        self.ctx
            .orders
            .place(&delivery)
            .await
            .map_err(|error| PageError::api(error, "Checkout failed."))?;

        self.state.clear_cart();

        Ok(())
    }

    /// Print the page.
    ///
    /// # Errors
    ///
    /// Returns a [`PageError`] if totals fail or the output cannot be written.
    pub fn render(&self, out: impl io::Write) -> Result<(), PageError> {
        receipt::write_checkout(out, &self.state)?;

        Ok(())
    }
}
