//! Validation-and-dispatch pipeline.
//!
//! Each request walks a fixed, linear sequence of states:
//!
//! 1. input validation → `MalformedInput` on failure
//! 2. jurisdiction lookup → `UnsupportedJurisdiction` on miss
//! 3. local format check → `Invalid(Format)` on mismatch, no network
//! 4. one backend call → `Valid`, `Invalid(Rejected)` or `BackendFailure`
//!
//! There are no retries and no timeouts at this layer; both belong to the
//! backend's transport.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::VatBackend;
use crate::core::{
    BackendId, InvalidReason, ValidationOutcome, ValidationRequest, VatGateError, validate_request,
};
use crate::registry::JurisdictionRegistry;

/// Routes validated requests to the backend owning their jurisdiction.
///
/// Cheap to share: hold it in an `Arc` and call it from any task.
pub struct Dispatcher {
    registry: JurisdictionRegistry,
    backends: HashMap<BackendId, Arc<dyn VatBackend>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("jurisdictions", &self.registry.len())
            .field("backends", &self.backends.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Dispatcher {
    /// Wire a registry to its backends.
    ///
    /// Every rule must name a registered backend, and that backend must
    /// advertise the rule's country. This is what guarantees at request
    /// time that a backend is never asked about a country it does not
    /// serve.
    ///
    /// # Errors
    ///
    /// Returns [`VatGateError::Backend`] for duplicate backend ids, and
    /// [`VatGateError::Registry`] for a rule whose backend is missing or
    /// does not serve its country.
    pub fn new(
        registry: JurisdictionRegistry,
        backends: impl IntoIterator<Item = Arc<dyn VatBackend>>,
    ) -> Result<Self, VatGateError> {
        let mut table: HashMap<BackendId, Arc<dyn VatBackend>> = HashMap::new();
        for backend in backends {
            let id = backend.id().clone();
            if table.insert(id.clone(), backend).is_some() {
                return Err(VatGateError::Backend(format!("duplicate backend id '{id}'")));
            }
        }

        for rule in registry.rules() {
            let cc = rule.country_code();
            let backend = table.get(rule.backend()).ok_or_else(|| {
                VatGateError::Registry(format!(
                    "rule for {cc} refers to unknown backend '{}'",
                    rule.backend()
                ))
            })?;
            if !backend.supports(cc) {
                return Err(VatGateError::Registry(format!(
                    "backend '{}' does not serve country code {cc}",
                    rule.backend()
                )));
            }
        }

        let referenced = registry.backends();
        for id in table.keys() {
            if !referenced.contains(id) {
                tracing::debug!(backend = %id, "backend registered without any jurisdiction");
            }
        }

        Ok(Self {
            registry,
            backends: table,
        })
    }

    pub fn registry(&self) -> &JurisdictionRegistry {
        &self.registry
    }

    /// Run the full pipeline on a raw key/value request.
    pub async fn dispatch(&self, raw: &Map<String, Value>) -> ValidationOutcome {
        match validate_request(raw) {
            Ok(request) => self.check(&request).await,
            Err(errors) => {
                tracing::info!(errors = errors.len(), "VAT request not validated");
                ValidationOutcome::MalformedInput(errors)
            }
        }
    }

    /// Run lookup, format check and backend call on a validated request.
    pub async fn check(&self, request: &ValidationRequest) -> ValidationOutcome {
        let cc = request.country_code.as_str();
        let vat = request.vat_number.as_str();

        let Some(rule) = self.registry.lookup(cc) else {
            tracing::info!(country = cc, "unsupported jurisdiction");
            return ValidationOutcome::UnsupportedJurisdiction {
                country_code: cc.to_string(),
            };
        };

        if !rule.matches(vat) {
            tracing::info!(country = cc, "VAT number does not match jurisdiction format");
            return ValidationOutcome::Invalid(InvalidReason::Format {
                country_code: cc.to_string(),
                vat_number: vat.to_string(),
            });
        }

        // Present by construction; see `Dispatcher::new`.
        let Some(backend) = self.backends.get(rule.backend()) else {
            tracing::error!(country = cc, backend = %rule.backend(), "no backend wired for rule");
            return ValidationOutcome::BackendFailure {
                reason: format!("no backend '{}'", rule.backend()),
            };
        };

        match backend.validate(cc, vat).await {
            Ok(true) => {
                tracing::info!(country = cc, backend = %rule.backend(), "VAT number valid");
                ValidationOutcome::Valid
            }
            Ok(false) => {
                tracing::info!(country = cc, backend = %rule.backend(), "VAT number rejected");
                ValidationOutcome::Invalid(InvalidReason::Rejected)
            }
            Err(e) => {
                tracing::warn!(country = cc, backend = %rule.backend(), error = %e, "external VAT validation failed");
                ValidationOutcome::BackendFailure {
                    reason: e.to_string(),
                }
            }
        }
    }
}
