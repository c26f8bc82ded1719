//! Core request types, input validation and error types.
//!
//! Everything here is pure and synchronous; network access lives in
//! [`crate::backend`].

pub mod countries;
mod error;
mod request;
mod types;

pub use error::*;
pub use request::*;
pub use types::*;
