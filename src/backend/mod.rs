//! External VAT verification backends.
//!
//! A backend is anything that can authoritatively answer "is this VAT
//! number currently valid" for a fixed set of countries. The dispatcher
//! only sees the [`VatBackend`] trait; new authorities are added by
//! implementing it and registering rules under a new [`BackendId`].
//!
//! | Backend | Feature | Countries | Protocol |
//! |---------|---------|-----------|----------|
//! | [`eu::ViesBackend`] | `eu` | EU member states, XI | REST/JSON |
//! | [`ch::UidBackend`] | `ch` | CH | SOAP 1.1 |

use async_trait::async_trait;
use thiserror::Error;

use crate::core::BackendId;

#[cfg(feature = "ch")]
pub mod ch;
#[cfg(feature = "eu")]
pub mod eu;
#[cfg(feature = "ch")]
mod soap;

/// Failure of a backend to produce a verdict.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    /// Connection, TLS or timeout failure.
    #[error("network error: {0}")]
    Network(String),
    /// The service answered with an error (HTTP status, fault, member state
    /// unavailable).
    #[error("service error: {0}")]
    Api(String),
    /// The service answered with something we could not decode.
    #[error("parse error: {0}")]
    Parse(String),
    /// The backend was asked about a country it does not serve.
    #[error("country code {0} is not served by this backend")]
    UnsupportedCountry(String),
}

/// Capability contract of an external VAT validator.
///
/// Implementations are shared across concurrent requests behind an `Arc`
/// and must not hold request-specific state.
#[async_trait]
pub trait VatBackend: Send + Sync {
    /// Identifier that jurisdiction rules refer to.
    fn id(&self) -> &BackendId;

    /// Country codes this backend can answer for.
    fn supported_countries(&self) -> &[String];

    /// Whether `vat_number` is currently registered in `country_code`.
    ///
    /// `Ok(false)` is a definitive "not valid"; `Err` means no verdict.
    async fn validate(&self, country_code: &str, vat_number: &str) -> Result<bool, BackendError>;

    fn supports(&self, country_code: &str) -> bool {
        self.supported_countries().iter().any(|c| c == country_code)
    }
}

/// Map a `reqwest` failure onto [`BackendError`].
#[cfg(any(feature = "eu", feature = "ch"))]
fn transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Network(format!("request timed out: {e}"))
    } else {
        BackendError::Network(e.to_string())
    }
}

/// Build the shared HTTP client used by the bundled backends.
#[cfg(any(feature = "eu", feature = "ch"))]
fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, BackendError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("vatgate/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(transport_error)
}
