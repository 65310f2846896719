//! Concession storefront client
//!
//! Backend services over HTTP, the page controllers that drive them, and the
//! configuration and logging the `concession` binary starts from.

pub mod api;
pub mod config;
pub mod context;
pub mod domain;
pub mod observability;
pub mod pages;
pub mod prompt;
pub mod session;

#[cfg(test)]
mod test;
