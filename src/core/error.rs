use thiserror::Error;

/// Errors raised while assembling the gateway (configuration, registry,
/// backend wiring). Per-request failures are never reported through this
/// type; they become a [`ValidationOutcome`](super::ValidationOutcome).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VatGateError {
    /// The configuration file is missing, unreadable or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A jurisdiction rule is invalid or conflicts with another rule.
    #[error("registry error: {0}")]
    Registry(String),

    /// A backend could not be constructed or is wired inconsistently.
    #[error("backend error: {0}")]
    Backend(String),

    /// Socket or file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single input error, tied to the request field that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Wire name of the offending field (e.g. "countryCode").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Join field messages the way they are reported to clients.
pub fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
