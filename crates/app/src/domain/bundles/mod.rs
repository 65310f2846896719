//! Bundles

pub mod service;

pub use service::*;
