//! Payments

pub mod service;

pub use service::*;
