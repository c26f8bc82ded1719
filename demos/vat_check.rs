use std::time::Duration;

use vatgate::backend::VatBackend;
use vatgate::backend::ch::{UID_WSDL_URL, UidBackend};
use vatgate::backend::eu::{VIES_URL, ViesBackend};
use vatgate::core::validate_request;
use vatgate::registry::JurisdictionRegistry;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Local checks (no network required)
    println!("=== Request and Format Validation ===\n");

    let registry = JurisdictionRegistry::builtin().expect("builtin registry compiles");
    let samples = [
        serde_json::json!({"countryCode": "DE", "vat": "DE123456789"}),
        serde_json::json!({"countryCode": "AT", "vat": "ATU12345678"}),
        serde_json::json!({"countryCode": "NL", "vat": "NL123456789B01"}),
        serde_json::json!({"countryCode": "CH", "vat": "CHE-116.281.710 MWST"}),
        serde_json::json!({"countryCode": "DE", "vat": "DE12345678"}), // too short
        serde_json::json!({"countryCode": "XX", "vat": "999999999"}),  // unsupported
        serde_json::json!({"countryCode": "de", "vat": ""}),           // malformed
    ];

    for sample in &samples {
        let Some(raw) = sample.as_object() else { continue };
        let req = match validate_request(raw) {
            Ok(req) => req,
            Err(errors) => {
                println!("  {sample} => MALFORMED: {}", vatgate::join_field_errors(&errors));
                continue;
            }
        };
        match registry.lookup(&req.country_code) {
            None => println!("  {sample} => no jurisdiction for {}", req.country_code),
            Some(rule) if rule.matches(&req.vat_number) => {
                println!("  {sample} => well-formed, routed to {}", rule.backend())
            }
            Some(_) => println!("  {sample} => does not match the {} format", req.country_code),
        }
    }

    // Live lookups only on request: `cargo run --example vat_check -- live`
    if std::env::args().nth(1).as_deref() != Some("live") {
        println!("\n  (pass `live` to query VIES and the UID register)");
        return;
    }

    println!("\n=== Live Lookups ===\n");

    let timeout = Duration::from_secs(30);
    let vies = ViesBackend::new(VIES_URL, timeout).expect("VIES client");
    let uid = UidBackend::new(UID_WSDL_URL, timeout).expect("UID client");

    match vies.check("DE", "DE811907980").await {
        Ok(r) => println!(
            "  VIES DE811907980 => valid={}, name={}",
            r.valid,
            r.name.as_deref().unwrap_or("-")
        ),
        Err(e) => println!("  VIES DE811907980 => error: {e}"),
    }
    match uid.validate("CH", "CHE-116.281.710 MWST").await {
        Ok(valid) => println!("  UID CHE-116.281.710 MWST => valid={valid}"),
        Err(e) => println!("  UID CHE-116.281.710 MWST => error: {e}"),
    }
}
