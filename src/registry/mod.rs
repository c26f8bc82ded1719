//! Jurisdiction registry: country code → VAT syntax pattern + backend.
//!
//! The registry is built once at startup, either from the builtin table or
//! from configuration, and is read-only afterwards. Lookups are exact and
//! case-sensitive; callers validate the code's shape first.
//!
//! # Example
//!
//! ```rust
//! use vatgate::registry::JurisdictionRegistry;
//!
//! let registry = JurisdictionRegistry::builtin().unwrap();
//! let rule = registry.lookup("CH").unwrap();
//! assert!(rule.matches("CHE-123.456.789"));
//! assert!(registry.lookup("ch").is_none());
//! ```

mod builtin;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::core::countries::is_jurisdiction_code;
use crate::core::{BackendId, VatGateError};

/// Syntax rule and backend owner for one jurisdiction.
#[derive(Debug, Clone)]
pub struct JurisdictionRule {
    country_code: String,
    pattern: Regex,
    backend: BackendId,
}

impl JurisdictionRule {
    /// Build a rule, compiling `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`VatGateError::Registry`] if the country code is not a
    /// known jurisdiction code or the pattern does not compile.
    pub fn new(
        country_code: impl Into<String>,
        pattern: &str,
        backend: BackendId,
    ) -> Result<Self, VatGateError> {
        let country_code = country_code.into();
        if !is_jurisdiction_code(&country_code) {
            return Err(VatGateError::Registry(format!(
                "unknown country code '{country_code}'"
            )));
        }
        let pattern = Regex::new(pattern).map_err(|e| {
            VatGateError::Registry(format!("invalid pattern for {country_code}: {e}"))
        })?;
        Ok(Self {
            country_code,
            pattern,
            backend,
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn backend(&self) -> &BackendId {
        &self.backend
    }

    /// Whether `vat_number` fits this jurisdiction's syntax.
    pub fn matches(&self, vat_number: &str) -> bool {
        self.pattern.is_match(vat_number)
    }
}

/// Serializable form of a [`JurisdictionRule`], as found in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    pub country_code: String,
    pub pattern: String,
    pub backend: BackendId,
}

/// Immutable country code → rule table.
#[derive(Debug, Clone, Default)]
pub struct JurisdictionRegistry {
    rules: HashMap<String, JurisdictionRule>,
}

impl JurisdictionRegistry {
    /// The default table: EU member states and XI on VIES, CH on the UID
    /// register.
    ///
    /// # Errors
    ///
    /// Only fails if the builtin table itself is broken.
    pub fn builtin() -> Result<Self, VatGateError> {
        let rules = builtin::BUILTIN_RULES
            .iter()
            .map(|&(cc, pattern, backend)| JurisdictionRule::new(cc, pattern, BackendId::new(backend)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rules(rules)
    }

    /// Build a registry from explicit rules.
    ///
    /// # Errors
    ///
    /// Returns [`VatGateError::Registry`] if two rules share a country code.
    pub fn from_rules(
        rules: impl IntoIterator<Item = JurisdictionRule>,
    ) -> Result<Self, VatGateError> {
        let mut table = HashMap::new();
        for rule in rules {
            let cc = rule.country_code.clone();
            if table.insert(cc.clone(), rule).is_some() {
                return Err(VatGateError::Registry(format!(
                    "duplicate rule for country code {cc}"
                )));
            }
        }
        Ok(Self { rules: table })
    }

    /// Build a registry from configuration entries.
    ///
    /// # Errors
    ///
    /// Same as [`JurisdictionRule::new`] and [`Self::from_rules`].
    pub fn from_specs(specs: &[RuleSpec]) -> Result<Self, VatGateError> {
        let rules = specs
            .iter()
            .map(|s| JurisdictionRule::new(s.country_code.clone(), &s.pattern, s.backend.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rules(rules)
    }

    pub fn lookup(&self, country_code: &str) -> Option<&JurisdictionRule> {
        self.rules.get(country_code)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &JurisdictionRule> {
        self.rules.values()
    }

    /// Registered country codes, sorted.
    pub fn country_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Country codes routed to `backend`, sorted.
    pub fn countries_for(&self, backend: &BackendId) -> Vec<String> {
        let mut codes: Vec<String> = self
            .rules
            .values()
            .filter(|r| &r.backend == backend)
            .map(|r| r.country_code.clone())
            .collect();
        codes.sort_unstable();
        codes
    }

    /// Distinct backend ids referenced by any rule.
    pub fn backends(&self) -> BTreeSet<&BackendId> {
        self.rules.values().map(|r| &r.backend).collect()
    }
}
