//! Process configuration, read once at startup from a JSON file.
//!
//! ```json
//! {
//!   "apiUrl": {
//!     "EUVatValidationService": "https://ec.europa.eu/taxation_customs/vies/rest-api/check-vat-number",
//!     "CHVatValidationService": "https://www.uid-wse-a.admin.ch/V5.0/PublicServices.svc?wsdl"
//!   },
//!   "port": 3000,
//!   "serverOptions": { "requestTimeout": 120000, "backendTimeout": 30000 }
//! }
//! ```
//!
//! Every key is optional. A `jurisdictions` array, when present, replaces
//! the builtin jurisdiction table.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::VatGateError;
use crate::registry::{JurisdictionRegistry, RuleSpec};

const DEFAULT_EU_URL: &str =
    "https://ec.europa.eu/taxation_customs/vies/rest-api/check-vat-number";
const DEFAULT_CH_URL: &str = "https://www.uid-wse-a.admin.ch/V5.0/PublicServices.svc?wsdl";

fn default_eu_url() -> String {
    DEFAULT_EU_URL.into()
}

fn default_ch_url() -> String {
    DEFAULT_CH_URL.into()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    120_000
}

fn default_backend_timeout() -> u64 {
    30_000
}

/// Upstream service URLs, keyed by the service names used on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUrls {
    #[serde(rename = "EUVatValidationService", default = "default_eu_url")]
    pub eu: String,
    #[serde(rename = "CHVatValidationService", default = "default_ch_url")]
    pub ch: String,
}

impl Default for ApiUrls {
    fn default() -> Self {
        Self {
            eu: default_eu_url(),
            ch: default_ch_url(),
        }
    }
}

/// Timeouts in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOptions {
    /// Upper bound for handling one inbound request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Upper bound for one outbound backend call.
    #[serde(default = "default_backend_timeout")]
    pub backend_timeout: u64,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            backend_timeout: default_backend_timeout(),
        }
    }
}

impl ServerOptions {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub api_url: ApiUrls,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub server_options: ServerOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdictions: Option<Vec<RuleSpec>>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_url: ApiUrls::default(),
            port: default_port(),
            server_options: ServerOptions::default(),
            jurisdictions: None,
        }
    }
}

impl Configuration {
    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`VatGateError::Config`] if the file cannot be read or is
    /// not valid configuration JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VatGateError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| VatGateError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| VatGateError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`VatGateError::Config`] on malformed JSON or wrong types.
    pub fn from_json(text: &str) -> Result<Self, VatGateError> {
        serde_json::from_str(text).map_err(|e| VatGateError::Config(e.to_string()))
    }

    /// The jurisdiction table this configuration asks for.
    ///
    /// # Errors
    ///
    /// Propagates registry construction errors.
    pub fn registry(&self) -> Result<JurisdictionRegistry, VatGateError> {
        match &self.jurisdictions {
            Some(specs) => JurisdictionRegistry::from_specs(specs),
            None => JurisdictionRegistry::builtin(),
        }
    }
}

/// Build a dispatcher with the bundled EU and CH backends.
///
/// # Errors
///
/// Fails if a backend cannot be built or the registry does not fit the
/// backends (see [`Dispatcher::new`](crate::dispatch::Dispatcher::new)).
#[cfg(all(feature = "eu", feature = "ch"))]
pub fn build_dispatcher(
    config: &Configuration,
) -> Result<crate::dispatch::Dispatcher, VatGateError> {
    use crate::backend::VatBackend;
    use crate::backend::ch::UidBackend;
    use crate::backend::eu::ViesBackend;
    use std::sync::Arc;

    let timeout = config.server_options.backend_timeout();
    let eu = ViesBackend::new(config.api_url.eu.clone(), timeout)
        .map_err(|e| VatGateError::Backend(format!("EU backend: {e}")))?;
    let ch = UidBackend::new(&config.api_url.ch, timeout)
        .map_err(|e| VatGateError::Backend(format!("CH backend: {e}")))?;

    let backends: Vec<Arc<dyn VatBackend>> = vec![Arc::new(eu), Arc::new(ch)];
    crate::dispatch::Dispatcher::new(config.registry()?, backends)
}
