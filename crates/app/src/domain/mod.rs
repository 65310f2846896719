//! Storefront Domain Concerns

pub mod bundles;
pub mod carts;
pub mod catalog;
pub mod coupons;
pub mod orders;
pub mod payments;
pub mod staff;
