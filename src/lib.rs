//! # vatgate
//!
//! VAT identifier validation gateway. A `(countryCode, vat)` pair is checked
//! for shape, routed to the VAT authority responsible for the country, and
//! the verdict is mapped onto one stable JSON contract.
//!
//! The pipeline is:
//!
//! 1. [`core::validate_request`] checks presence, type and ISO-2 shape.
//! 2. [`registry::JurisdictionRegistry`] resolves the country to a rule
//!    (syntax pattern plus backend id).
//! 3. [`dispatch::Dispatcher`] applies the pattern locally and only then
//!    calls the [`backend::VatBackend`] that owns the jurisdiction.
//! 4. [`response::ApiResponse`] turns the [`core::ValidationOutcome`] into a
//!    status code and body.
//!
//! ## Quick Start
//!
//! ```rust
//! use vatgate::core::validate_request;
//! use vatgate::registry::JurisdictionRegistry;
//!
//! let raw = serde_json::json!({ "countryCode": "DE", "vat": "DE123456789" });
//! let request = validate_request(raw.as_object().unwrap()).unwrap();
//!
//! let registry = JurisdictionRegistry::builtin().unwrap();
//! let rule = registry.lookup(&request.country_code).unwrap();
//! assert!(rule.matches(&request.vat_number));
//! assert_eq!(rule.backend().as_str(), "eu-vies");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Input validation, registry, dispatcher, response mapping |
//! | `eu` | EU VIES REST backend |
//! | `ch` | Swiss UID register SOAP backend |
//! | `server` | axum HTTP server and `vatgate` binary |
//! | `all` | Everything (also the default) |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod registry;

#[cfg(feature = "core")]
pub mod backend;

#[cfg(feature = "core")]
pub mod dispatch;

#[cfg(feature = "core")]
pub mod response;

#[cfg(feature = "core")]
pub mod config;

#[cfg(feature = "server")]
pub mod server;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
