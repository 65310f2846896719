//! Coupons

pub mod service;

pub use service::*;
