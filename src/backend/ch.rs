//! Swiss UID register backend (UID-WSE public services, SOAP 1.1).
//!
//! Uses the `ValidateVatNumber` operation, which answers whether a
//! `CHE-xxx.xxx.xxx` number is registered for VAT (MWST/TVA/IVA).

use async_trait::async_trait;
use std::time::Duration;

use super::soap::{EnvelopeWriter, scan_response};
use super::{BackendError, VatBackend, http_client, transport_error};
use crate::core::BackendId;

/// WSDL location of the public UID services. The SOAP endpoint is the
/// same URL without the `?wsdl` query.
pub const UID_WSDL_URL: &str = "https://www.uid-wse-a.admin.ch/V5.0/PublicServices.svc?wsdl";

const UID_NS: &str = "http://www.uid.admin.ch/xmlns/uid-wse";
const VALIDATE_ACTION: &str =
    "http://www.uid.admin.ch/xmlns/uid-wse/IPublicServices/ValidateVatNumber";

/// Backend for Switzerland via the federal UID register.
#[derive(Debug, Clone)]
pub struct UidBackend {
    id: BackendId,
    endpoint: String,
    client: reqwest::Client,
    countries: Vec<String>,
}

impl UidBackend {
    /// Create a backend for `url`, which may be the WSDL address or the
    /// service endpoint itself.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Network`] if the HTTP client cannot be built.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            id: BackendId::ch_uid(),
            endpoint: soap_endpoint(url).to_string(),
            client: http_client(timeout)?,
            countries: vec!["CH".to_string()],
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Strip a trailing `?wsdl` (any case) from a service URL.
fn soap_endpoint(url: &str) -> &str {
    match url.len().checked_sub(5) {
        Some(cut) if url.is_char_boundary(cut) && url[cut..].eq_ignore_ascii_case("?wsdl") => {
            &url[..cut]
        }
        _ => url,
    }
}

/// Build the `ValidateVatNumber` request envelope.
pub fn validate_vat_envelope(vat_number: &str) -> Result<String, BackendError> {
    let mut w = EnvelopeWriter::new(&[("uid", UID_NS)])?;
    w.start_element("uid:ValidateVatNumber")?;
    w.text_element("uid:vatNumber", vat_number)?;
    w.end_element("uid:ValidateVatNumber")?;
    w.finish()
}

/// Decode a `ValidateVatNumber` response.
///
/// # Errors
///
/// A SOAP fault becomes [`BackendError::Api`]; a missing or non-boolean
/// `ValidateVatNumberResult` becomes [`BackendError::Parse`].
pub fn parse_validate_response(xml: &str) -> Result<bool, BackendError> {
    let scan = scan_response(xml, "ValidateVatNumberResult")?;
    if let Some(fault) = scan.fault {
        return Err(BackendError::Api(fault));
    }
    match scan.value.as_deref() {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(BackendError::Parse(format!(
            "unexpected ValidateVatNumberResult '{other}'"
        ))),
        None => Err(BackendError::Parse(
            "response has no ValidateVatNumberResult".into(),
        )),
    }
}

#[async_trait]
impl VatBackend for UidBackend {
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

        let envelope = validate_vat_envelope(vat_number)?;
        tracing::debug!(endpoint = %self.endpoint, "calling UID ValidateVatNumber");

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{VALIDATE_ACTION}\""))
            .body(envelope)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;

        // Faults arrive with HTTP 500, so look at the body before the status.
        match parse_validate_response(&body) {
            Ok(valid) if status.is_success() => Ok(valid),
            Ok(_) => Err(BackendError::Api(format!("HTTP {status}"))),
            Err(BackendError::Parse(_)) if !status.is_success() => {
                Err(BackendError::Api(format!("HTTP {status}")))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_RESPONSE: &str = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><ValidateVatNumberResponse xmlns="http://www.uid.admin.ch/xmlns/uid-wse"><ValidateVatNumberResult>true</ValidateVatNumberResult></ValidateVatNumberResponse></s:Body></s:Envelope>"#;

    #[test]
    fn endpoint_strips_wsdl() {
        assert_eq!(
            soap_endpoint(UID_WSDL_URL),
            "https://www.uid-wse-a.admin.ch/V5.0/PublicServices.svc"
        );
        assert_eq!(soap_endpoint("http://x/svc?WSDL"), "http://x/svc");
        assert_eq!(soap_endpoint("http://x/svc"), "http://x/svc");
        assert_eq!(soap_endpoint("abc"), "abc");
    }

    #[test]
    fn envelope_carries_number() {
        let xml = validate_vat_envelope("CHE-123.456.789").unwrap();
        assert!(xml.contains("xmlns:uid=\"http://www.uid.admin.ch/xmlns/uid-wse\""));
        assert!(xml.contains(
            "<uid:ValidateVatNumber><uid:vatNumber>CHE-123.456.789</uid:vatNumber></uid:ValidateVatNumber>"
        ));
    }

    #[test]
    fn parses_true_and_false() {
        assert!(parse_validate_response(VALID_RESPONSE).unwrap());
        let invalid = VALID_RESPONSE.replace(">true<", ">false<");
        assert!(!parse_validate_response(&invalid).unwrap());
    }

    #[test]
    fn fault_is_api_error() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><s:Fault><faultcode>s:Client</faultcode><faultstring xml:lang="en">Request_limit_exceeded</faultstring></s:Fault></s:Body></s:Envelope>"#;
        let err = parse_validate_response(xml).unwrap_err();
        assert!(matches!(err, BackendError::Api(ref m) if m == "Request_limit_exceeded"));
    }

    #[test]
    fn missing_result_is_parse_error() {
        let xml = r#"<s:Envelope xmlns:s="x"><s:Body/></s:Envelope>"#;
        assert!(matches!(parse_validate_response(xml), Err(BackendError::Parse(_))));
    }

    #[test]
    fn only_ch_is_supported() {
        let b = UidBackend::new(UID_WSDL_URL, Duration::from_secs(5)).unwrap();
        assert_eq!(b.supported_countries(), ["CH".to_string()]);
        assert_eq!(b.endpoint(), "https://www.uid-wse-a.admin.ch/V5.0/PublicServices.svc");
    }
}
