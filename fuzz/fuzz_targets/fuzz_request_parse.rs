#![no_main]

use libfuzzer_sys::fuzz_target;
use vatgate::registry::JurisdictionRegistry;

fuzz_target!(|data: &[u8]| {
    let Ok(serde_json::Value::Object(raw)) = serde_json::from_slice(data) else {
        return;
    };
    // Must not panic: malformed input is an Err, never a crash.
    if let Ok(req) = vatgate::core::validate_request(&raw) {
        if let Ok(registry) = JurisdictionRegistry::builtin() {
            if let Some(rule) = registry.lookup(&req.country_code) {
                let _ = rule.matches(&req.vat_number);
            }
        }
    }
});
