//! Minimal SOAP 1.1 envelope writing and response scanning on quick-xml.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use super::BackendError;

pub(super) const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

fn xml_io(e: std::io::Error) -> BackendError {
    BackendError::Parse(format!("XML write error: {e}"))
}

pub(super) struct EnvelopeWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl EnvelopeWriter {
    /// Start `<soapenv:Envelope>` with an empty header and open the body.
    /// `namespaces` are extra `(prefix, uri)` declarations on the envelope.
    pub(super) fn new(namespaces: &[(&str, &str)]) -> Result<Self, BackendError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;

        let mut envelope = BytesStart::new("soapenv:Envelope");
        envelope.push_attribute(("xmlns:soapenv", SOAP_ENV_NS));
        for (prefix, uri) in namespaces {
            envelope.push_attribute((format!("xmlns:{prefix}").as_str(), *uri));
        }
        writer.write_event(Event::Start(envelope)).map_err(xml_io)?;
        writer
            .write_event(Event::Empty(BytesStart::new("soapenv:Header")))
            .map_err(xml_io)?;
        writer
            .write_event(Event::Start(BytesStart::new("soapenv:Body")))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub(super) fn start_element(&mut self, name: &str) -> Result<&mut Self, BackendError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub(super) fn end_element(&mut self, name: &str) -> Result<&mut Self, BackendError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub(super) fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, BackendError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Close body and envelope and return the document.
    pub(super) fn finish(mut self) -> Result<String, BackendError> {
        self.end_element("soapenv:Body")?;
        self.end_element("soapenv:Envelope")?;
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| BackendError::Parse(format!("XML UTF-8 error: {e}")))
    }
}

/// What a SOAP response body contained, by local element name.
#[derive(Debug, Default)]
pub(super) struct SoapScan {
    /// Text of the first element whose local name matched the target.
    pub(super) value: Option<String>,
    /// `faultstring` (SOAP 1.1) or `Text` under `Reason` (SOAP 1.2).
    pub(super) fault: Option<String>,
}

/// Scan `xml` for the text of the first element named `target` (ignoring
/// namespace prefixes) and for a SOAP fault.
pub(super) fn scan_response(xml: &str, target: &str) -> Result<SoapScan, BackendError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut scan = SoapScan::default();
    let mut path: Vec<String> = Vec::new();
    let mut in_fault = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "Fault" {
                    in_fault = true;
                }
                path.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"Fault" {
                    scan.fault.get_or_insert_with(|| "SOAP fault".into());
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| BackendError::Parse(format!("XML text error: {err}")))?
                    .into_owned();
                match path.last().map(String::as_str) {
                    Some(current) if current == target && scan.value.is_none() => {
                        scan.value = Some(text);
                    }
                    Some("faultstring") | Some("Text") if in_fault => {
                        scan.fault.get_or_insert(text);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                if path.pop().as_deref() == Some("Fault") {
                    in_fault = false;
                    scan.fault.get_or_insert_with(|| "SOAP fault".into());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BackendError::Parse(format!("XML parse error: {e}")));
            }
            _ => {}
        }
    }

    Ok(scan)
}
