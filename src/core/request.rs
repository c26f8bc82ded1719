//! Structural validation of the raw `(countryCode, vat)` pair.
//!
//! This layer knows nothing about jurisdictions: it only checks that both
//! fields are present, are strings, and have the basic shape. Whether the
//! country is served, and whether the number fits that country's syntax,
//! is decided later by the dispatcher.

use serde_json::{Map, Value};

use super::countries::is_country_code_shape;
use super::{FieldError, ValidationRequest};

/// Wire name of the country code field.
pub const COUNTRY_CODE_FIELD: &str = "countryCode";
/// Wire name of the VAT number field.
pub const VAT_FIELD: &str = "vat";
/// Accepted alternative name for [`VAT_FIELD`].
pub const VAT_FIELD_ALIAS: &str = "vatNumber";

pub const COUNTRY_CODE_MESSAGE: &str =
    "countryCode must be a string in ISO 2 format and consist of two uppercase letters";
pub const VAT_MESSAGE: &str = "vat must be a string and not be empty or null";

/// Validate a raw request object taken from a JSON body or a query string.
///
/// Every violation is collected; the country code is reported before the
/// VAT number. `vat` wins over `vatNumber` when both keys are present,
/// unless `vat` is `null`.
/// Values are not trimmed or case-folded.
///
/// # Errors
///
/// Returns all [`FieldError`]s found when either field is missing, not a
/// string, or has the wrong shape.
pub fn validate_request(raw: &Map<String, Value>) -> Result<ValidationRequest, Vec<FieldError>> {
    let mut errors = Vec::new();

    let country_code = match raw.get(COUNTRY_CODE_FIELD) {
        Some(Value::String(cc)) if is_country_code_shape(cc) => Some(cc.clone()),
        _ => {
            errors.push(FieldError::new(COUNTRY_CODE_FIELD, COUNTRY_CODE_MESSAGE));
            None
        }
    };

    let vat = raw
        .get(VAT_FIELD)
        .filter(|v| !v.is_null())
        .or_else(|| raw.get(VAT_FIELD_ALIAS));
    let vat_number = match vat {
        Some(Value::String(v)) if !v.is_empty() => Some(v.clone()),
        _ => {
            errors.push(FieldError::new(VAT_FIELD, VAT_MESSAGE));
            None
        }
    };

    match (country_code, vat_number) {
        (Some(country_code), Some(vat_number)) => Ok(ValidationRequest {
            country_code,
            vat_number,
        }),
        _ => Err(errors),
    }
}
