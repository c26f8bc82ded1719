//! Mapping of [`ValidationOutcome`]s onto the HTTP status/body contract.
//!
//! | Outcome | Status |
//! |---------|--------|
//! | `Valid` | 200 |
//! | `Invalid(Rejected)` | 200 |
//! | `Invalid(Format)` | 400 |
//! | `MalformedInput` | 400 |
//! | `BackendFailure` | 500 |
//! | `UnsupportedJurisdiction` | 501 |

use serde::{Deserialize, Serialize};

use crate::core::{InvalidReason, ValidationOutcome, join_field_errors};

pub const VALID_DETAILS: &str = "VAT number is valid for the given country code.";
pub const REJECTED_DETAILS: &str = "VAT number marked as invalid by the external service.";
pub const BACKEND_FAILURE_MESSAGE: &str =
    "An error occurred while validating the VAT number via external Service.";

/// JSON body of every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// A completed validation, positive or negative.
    Verdict { validated: bool, details: String },
    /// Anything that did not produce a verdict.
    Error { code: u16, message: String },
}

/// Status code plus body, independent of any HTTP framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// An error response whose body repeats the status code.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Error {
                code: status,
                message: message.into(),
            },
        }
    }

    fn verdict(validated: bool, details: &str) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Verdict {
                validated,
                details: details.to_string(),
            },
        }
    }

    pub fn from_outcome(outcome: &ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Valid => Self::verdict(true, VALID_DETAILS),
            ValidationOutcome::Invalid(InvalidReason::Rejected) => {
                Self::verdict(false, REJECTED_DETAILS)
            }
            ValidationOutcome::Invalid(InvalidReason::Format {
                country_code,
                vat_number,
            }) => Self::error(
                400,
                format!(
                    "The VAT number {vat_number} does not match the expected format for country code {country_code}."
                ),
            ),
            ValidationOutcome::UnsupportedJurisdiction { country_code } => Self::error(
                501,
                format!(
                    "The country code {country_code} is not supported by any VAT validation service."
                ),
            ),
            ValidationOutcome::MalformedInput(errors) => {
                Self::error(400, join_field_errors(errors))
            }
            ValidationOutcome::BackendFailure { .. } => Self::error(500, BACKEND_FAILURE_MESSAGE),
        }
    }
}

impl From<&ValidationOutcome> for ApiResponse {
    fn from(outcome: &ValidationOutcome) -> Self {
        Self::from_outcome(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldError;

    #[test]
    fn valid_is_200() {
        let r = ApiResponse::from_outcome(&ValidationOutcome::Valid);
        assert_eq!(r.status, 200);
        assert_eq!(
            r.body,
            ResponseBody::Verdict {
                validated: true,
                details: VALID_DETAILS.into()
            }
        );
    }

    #[test]
    fn rejected_is_200_false() {
        let r = ApiResponse::from_outcome(&ValidationOutcome::Invalid(InvalidReason::Rejected));
        assert_eq!(r.status, 200);
        assert!(matches!(r.body, ResponseBody::Verdict { validated: false, .. }));
    }

    #[test]
    fn format_mismatch_is_400() {
        let r = ApiResponse::from_outcome(&ValidationOutcome::Invalid(InvalidReason::Format {
            country_code: "DE".into(),
            vat_number: "INVALID".into(),
        }));
        assert_eq!(r.status, 400);
        assert_eq!(
            r.body,
            ResponseBody::Error {
                code: 400,
                message: "The VAT number INVALID does not match the expected format for country code DE."
                    .into()
            }
        );
    }

    #[test]
    fn malformed_joins_messages() {
        let r = ApiResponse::from_outcome(&ValidationOutcome::MalformedInput(vec![
            FieldError::new("countryCode", "bad country"),
            FieldError::new("vat", "bad vat"),
        ]));
        assert_eq!(r, ApiResponse::error(400, "bad country; bad vat"));
    }

    #[test]
    fn backend_failure_hides_detail() {
        let r = ApiResponse::from_outcome(&ValidationOutcome::BackendFailure {
            reason: "tls handshake eof".into(),
        });
        assert_eq!(r, ApiResponse::error(500, BACKEND_FAILURE_MESSAGE));
    }

    #[test]
    fn unsupported_is_501() {
        let r: ApiResponse = (&ValidationOutcome::UnsupportedJurisdiction {
            country_code: "XX".into(),
        })
            .into();
        assert_eq!(r.status, 501);
    }

    #[test]
    fn untagged_serialization() {
        let json = serde_json::to_value(ApiResponse::error(501, "nope").body).unwrap();
        assert_eq!(json, serde_json::json!({"code": 501, "message": "nope"}));
    }
}
