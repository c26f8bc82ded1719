//! EU VIES REST API backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{BackendError, VatBackend, http_client, transport_error};
use crate::core::BackendId;
use crate::core::countries::{EU_MEMBER_STATES, NORTHERN_IRELAND, vies_country_code};

/// Public VIES endpoint. No authentication.
pub const VIES_URL: &str = "https://ec.europa.eu/taxation_customs/vies/rest-api/check-vat-number";

/// Full VIES answer for one number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViesResult {
    /// Whether the VAT number is currently valid.
    pub valid: bool,
    /// Date of the request (YYYY-MM-DD).
    pub request_date: Option<String>,
    /// Registered company name (if published by the member state).
    pub name: Option<String>,
    /// Registered address (if published by the member state).
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViesApiResponse {
    valid: Option<bool>,
    request_date: Option<String>,
    name: Option<String>,
    address: Option<String>,
    error_wrappers: Option<Vec<ViesErrorWrapper>>,
}

#[derive(Debug, Deserialize)]
struct ViesErrorWrapper {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViesRequest {
    country_code: String,
    vat_number: String,
}

impl ViesRequest {
    /// VIES wants the member state code separately and the number without
    /// its prefix; Greece is `EL`.
    fn new(country_code: &str, vat_number: &str) -> Self {
        let vies_cc = vies_country_code(country_code);
        let number = vat_number.strip_prefix(vies_cc).unwrap_or(vat_number);
        Self {
            country_code: vies_cc.to_string(),
            vat_number: number.to_string(),
        }
    }
}

/// Backend for the EU member states (and XI) via VIES.
#[derive(Debug, Clone)]
pub struct ViesBackend {
    id: BackendId,
    url: String,
    client: reqwest::Client,
    countries: Vec<String>,
}

impl ViesBackend {
    /// Create a backend posting to `url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Network`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let mut countries: Vec<String> = EU_MEMBER_STATES.iter().map(|c| c.to_string()).collect();
        countries.push(NORTHERN_IRELAND.to_string());
        Ok(Self {
            id: BackendId::eu_vies(),
            url: url.into(),
            client: http_client(timeout)?,
            countries,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query VIES and return the full result.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Network` on connection issues,
    /// `BackendError::Api` on a non-2xx status or when VIES reports an
    /// error (e.g. member state unavailable), `BackendError::Parse` on
    /// unexpected response formats.
    pub async fn check(&self, country_code: &str, vat_number: &str) -> Result<ViesResult, BackendError> {
        let req = ViesRequest::new(country_code, vat_number);
        tracing::debug!(country = %req.country_code, url = %self.url, "querying VIES");

        let resp = self
            .client
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(BackendError::Api(format!("HTTP {status}: {body}")));
        }

        parse_vies_response(&body)
    }
}

/// Decode a successful VIES response body.
fn parse_vies_response(body: &str) -> Result<ViesResult, BackendError> {
    let api_resp: ViesApiResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;

    if let Some(err) = api_resp.error_wrappers.as_ref().and_then(|w| w.first()) {
        let msg = err
            .message
            .clone()
            .or_else(|| err.error.clone())
            .unwrap_or_else(|| "unknown error".into());
        return Err(BackendError::Api(msg));
    }

    let valid = api_resp
        .valid
        .ok_or_else(|| BackendError::Parse("response has no 'valid' field".into()))?;

    Ok(ViesResult {
        valid,
        request_date: api_resp.request_date,
        name: api_resp.name.filter(|n| n != "---" && !n.is_empty()),
        address: api_resp.address.filter(|a| a != "---" && !a.is_empty()),
    })
}

#[async_trait]
impl VatBackend for ViesBackend {
    fn id(&self) -> &BackendId {
        &self.id
    }

    fn supported_countries(&self) -> &[String] {
        &self.countries
    }

    async fn validate(&self, country_code: &str, vat_number: &str) -> Result<bool, BackendError> {
        if !self.supports(country_code) {
            return Err(BackendError::UnsupportedCountry(country_code.to_string()));
        }
        let result = self.check(country_code, vat_number).await?;
        if !result.valid {
            tracing::debug!(country = country_code, "VIES reports number as invalid");
        }
        Ok(result.valid)
    }
}
