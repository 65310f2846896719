//! Backend API access.

mod client;
pub mod retry;

pub use client::{ApiClient, ApiError};
