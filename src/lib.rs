//! Concession
//!
//! Concession is the domain core of a cinema snack storefront: catalog records, cart reconciliation,
//! coupon and donation handling, and checkout totals. It performs no I/O.

pub mod bundles;
pub mod cart;
pub mod checkout;
pub mod coupons;
pub mod donations;
pub mod ids;
pub mod money;
pub mod payments;
pub mod prelude;
pub mod products;
pub mod receipt;
pub mod staff;
