use serde::{Deserialize, Serialize};
use std::fmt;

use super::FieldError;

/// A structurally valid validation request.
///
/// Only produced by [`validate_request`](super::validate_request), so the
/// country code is always two uppercase ASCII letters and the VAT number
/// is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    /// ISO 3166-1 alpha-2 code, e.g. "DE".
    pub country_code: String,
    /// VAT identifier as supplied by the caller, e.g. "DE123456789".
    pub vat_number: String,
}

/// Identifier of a configured backend, e.g. `eu-vies`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendId(String);

impl BackendId {
    /// The EU VIES REST service.
    pub const EU_VIES: &'static str = "eu-vies";
    /// The Swiss UID register SOAP service.
    pub const CH_UID: &'static str = "ch-uid";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn eu_vies() -> Self {
        Self::new(Self::EU_VIES)
    }

    pub fn ch_uid() -> Self {
        Self::new(Self::CH_UID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a VAT number was judged invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// The number does not match the jurisdiction's syntax pattern.
    /// Detected locally; no backend was called.
    Format {
        country_code: String,
        vat_number: String,
    },
    /// The backend answered that the number is not currently valid.
    Rejected,
}

/// Terminal classification of one validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The responsible authority confirmed the number.
    Valid,
    /// The number failed the local format check or was rejected upstream.
    Invalid(InvalidReason),
    /// No jurisdiction rule exists for the country code.
    UnsupportedJurisdiction { country_code: String },
    /// The request itself is structurally broken.
    MalformedInput(Vec<FieldError>),
    /// The backend could not produce a verdict.
    BackendFailure { reason: String },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Short stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid(InvalidReason::Format { .. }) => "invalid_format",
            Self::Invalid(InvalidReason::Rejected) => "rejected",
            Self::UnsupportedJurisdiction { .. } => "unsupported_jurisdiction",
            Self::MalformedInput(_) => "malformed_input",
            Self::BackendFailure { .. } => "backend_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case() {
        let req = ValidationRequest {
            country_code: "DE".into(),
            vat_number: "DE123456789".into(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"countryCode\":\"DE\""));
        assert!(json.contains("\"vatNumber\":\"DE123456789\""));
    }

    #[test]
    fn backend_id_is_transparent() {
        let id: BackendId = serde_json::from_str("\"eu-vies\"").unwrap();
        assert_eq!(id, BackendId::eu_vies());
        assert_eq!(id.to_string(), "eu-vies");
    }

    #[test]
    fn outcome_kinds() {
        assert!(ValidationOutcome::Valid.is_valid());
        assert!(!ValidationOutcome::Invalid(InvalidReason::Rejected).is_valid());
        assert_eq!(
            ValidationOutcome::Invalid(InvalidReason::Format {
                country_code: "DE".into(),
                vat_number: "X".into(),
            })
            .kind(),
            "invalid_format"
        );
        assert_eq!(
            ValidationOutcome::BackendFailure {
                reason: "timeout".into()
            }
            .kind(),
            "backend_failure"
        );
    }
}
