//! HTTP surface
//!
//! Controllers are thin: they build a request, hand it to the mediator and
//! translate the resulting envelope with [`services::helpers::handle_result`].

pub mod context;
pub mod error;
pub mod middleware;
pub mod services;

pub use error::ApiError;
