//! Concession prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bundles::{
        BUNDLE_DISCOUNT_POINTS, Bundle, BundleDraft, BundleDraftError, BundleId, BundleItem,
        BundlePayload, DraftLine, find_bundle,
    },
    cart::{Cart, CartEntry, CartError, CartItem, CartItemId, CartLine, QuantityChange},
    checkout::{Catalog, CheckoutError, CheckoutState, CustomerShowing, DeliveryRequest, Totals},
    coupons::{
        AppliedCoupon, ApplyCouponRequest, CouponError, CouponFlow, CouponId, CouponListing,
        CouponState, CouponStep, PuzzleChallenge, PuzzlePrompt, PuzzleResponse,
    },
    donations::{
        DonationError, DonationForm, DonationSelection, DonationType, DonationValue, Ngo, NgoId,
    },
    ids::TypedId,
    money::{Amount, PricingError},
    payments::{AddFundsRequest, AddFundsResponse, PaymentMethod, PaymentMethodId},
    products::{MenuProduct, Product, ProductId, Supplier, SupplierDirectory, SupplierId},
    receipt::ReceiptError,
    staff::StaffMember,
};
