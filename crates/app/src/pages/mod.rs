//! Pages
//!
//! Controllers for the storefront pages. Each action catches its own errors
//! and turns them into the page's banner; successes post notices.

use thiserror::Error;
use tracing::{error, info};

use concession::{
    bundles::{BundleDraft, BundleDraftError, BundleId},
    cart::CartError,
    checkout::CheckoutError,
    coupons::CouponError,
    donations::DonationError,
    money::PricingError,
    payments::PaymentMethodId,
    products::{Product, ProductId},
    receipt::ReceiptError,
};

use crate::{
    api::ApiError,
    domain::bundles::BundlesService,
};

pub mod bundles;
pub mod checkout;
pub mod menu;

pub use bundles::BundlesPage;
pub use checkout::CheckoutPage;
pub use menu::MenuPage;

/// Errors surfaced in a page's banner.
#[derive(Debug, Error)]
pub enum PageError {
    /// A backend request failed.
    #[error("{message}")]
    Api {
        /// Text shown to the user
        message: String,

        /// Underlying request error
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Coupon(#[from] CouponError),

    #[error(transparent)]
    Donation(#[from] DonationError),

    #[error(transparent)]
    BundleDraft(#[from] BundleDraftError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Render(#[from] ReceiptError),

    #[error("Unknown product {0}")]
    UnknownProduct(ProductId),

    #[error("Unknown bundle {0}")]
    UnknownBundle(BundleId),

    #[error("Unknown payment method {0}")]
    UnknownPaymentMethod(PaymentMethodId),

    #[error("{0} is sold out")]
    SoldOut(String),

    #[error("Only admins can manage bundles.")]
    NotAdmin,
}

impl PageError {
    /// Wrap a failed request. The backend's message is shown when it sent
    /// one, otherwise `fallback`.
    pub(crate) fn api(source: ApiError, fallback: &str) -> Self {
        let message = source.user_message(fallback);

        error!(error = %source, "{message}");

        Self::Api { message, source }
    }

    /// Prefix the user-facing text of a request failure.
    #[must_use]
    pub(crate) fn prefixed(self, prefix: &str) -> Self {
        match self {
            Self::Api { message, source } => Self::Api {
                message: format!("{prefix}: {message}"),
                source,
            },
            other => other,
        }
    }
}

/// Banner and notices shown above a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    banner: Option<String>,
    notices: Vec<String>,
}

impl Feedback {
    /// Current error banner.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Hide the banner before a new action runs.
    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// Show `result`'s error in the banner, passing successes through.
    pub fn record<T>(&mut self, result: Result<T, PageError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.banner = Some(error.to_string());

                None
            }
        }
    }

    /// Post a one-off success message.
    pub fn notify(&mut self, notice: impl Into<String>) {
        let notice = notice.into();

        info!(notice, "page notice");

        self.notices.push(notice);
    }

    /// Drain the notices posted since the last call.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

/// Create or update the drafted bundle, returning the success notice.
pub(crate) async fn submit_draft(
    bundles: &dyn BundlesService,
    draft: &BundleDraft,
    catalog: &[Product],
    fallback: &str,
) -> Result<&'static str, PageError> {
    let payload = draft.payload(catalog)?;

    let (result, notice) = match draft.editing {
        Some(id) => (
            bundles.update(id, &payload).await,
            "Bundle updated successfully!",
        ),
        None => (bundles.create(&payload).await, "Bundle created successfully!"),
    };

    result.map_err(|error| PageError::api(error, fallback))?;

    Ok(notice)
}
