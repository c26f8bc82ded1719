//! Property-based tests for the validation-and-dispatch pipeline.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "core")]

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use vatgate::backend::{BackendError, VatBackend};
use vatgate::core::{BackendId, InvalidReason, ValidationOutcome, validate_request};
use vatgate::dispatch::Dispatcher;
use vatgate::registry::JurisdictionRegistry;
use vatgate::response::{ApiResponse, ResponseBody};

struct CountingBackend {
    id: BackendId,
    countries: Vec<String>,
    answer: Option<bool>,
    calls: AtomicUsize,
}

#[async_trait]
impl VatBackend for CountingBackend {
    fn id(&self) -> &BackendId {
        &self.id
    }

    fn supported_countries(&self) -> &[String] {
        &self.countries
    }

    async fn validate(&self, _: &str, _: &str) -> Result<bool, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .ok_or_else(|| BackendError::Network("connection refused".into()))
    }
}

/// Dispatcher over the builtin table where every backend gives `answer`.
fn setup(answer: Option<bool>) -> (Dispatcher, Vec<Arc<CountingBackend>>) {
    let registry = JurisdictionRegistry::builtin().unwrap();
    let backends: Vec<Arc<CountingBackend>> = [BackendId::eu_vies(), BackendId::ch_uid()]
        .into_iter()
        .map(|id| {
            Arc::new(CountingBackend {
                countries: registry.countries_for(&id),
                id,
                answer,
                calls: AtomicUsize::new(0),
            })
        })
        .collect();
    let handles = backends
        .iter()
        .map(|b| Arc::clone(b) as Arc<dyn VatBackend>)
        .collect::<Vec<_>>();
    (Dispatcher::new(registry, handles).unwrap(), backends)
}

fn total_calls(backends: &[Arc<CountingBackend>]) -> usize {
    backends.iter().map(|b| b.calls.load(Ordering::SeqCst)).sum()
}

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(f)
}

fn raw(cc: &str, vat: &str) -> Map<String, Value> {
    json!({"countryCode": cc, "vat": vat})
        .as_object()
        .cloned()
        .unwrap()
}

/// Two registered countries and a matching number for each.
fn well_formed_pair() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        "[0-9]{9}".prop_map(|n| ("DE".to_string(), format!("DE{n}"))),
        "[0-9]{3}".prop_map(|n| ("CH".to_string(), format!("CHE-{n}.{n}.{n}"))),
        "[0-9]{8}".prop_map(|n| ("AT".to_string(), format!("ATU{n}"))),
        "[0-9]{9}".prop_map(|n| ("NL".to_string(), format!("NL{n}B01"))),
    ]
}

fn registered_country() -> impl Strategy<Value = String> {
    let codes: Vec<String> = JurisdictionRegistry::builtin()
        .unwrap()
        .country_codes()
        .into_iter()
        .map(String::from)
        .collect();
    prop::sample::select(codes)
}

proptest! {
    #[test]
    fn bad_country_shape_is_always_malformed(
        cc in "[a-zA-Z0-9 ]{0,4}".prop_filter("not two uppercase letters", |s| {
            !(s.len() == 2 && s.bytes().all(|b| b.is_ascii_uppercase()))
        }),
        vat in ".*",
    ) {
        let errors = validate_request(&raw(&cc, &vat)).unwrap_err();
        prop_assert!(errors.iter().any(|e| e.field == "countryCode"));

        let (d, backends) = setup(Some(true));
        let out = block_on(d.dispatch(&raw(&cc, &vat)));
        prop_assert!(matches!(out, ValidationOutcome::MalformedInput(_)));
        prop_assert_eq!(ApiResponse::from_outcome(&out).status, 400);
        prop_assert_eq!(total_calls(&backends), 0);
    }

    #[test]
    fn unregistered_country_is_unsupported(
        cc in "[A-Z]{2}".prop_filter("registered", |cc| {
            JurisdictionRegistry::builtin().unwrap().lookup(cc).is_none()
        }),
        vat in "[A-Z0-9]{1,14}",
    ) {
        let (d, backends) = setup(Some(true));
        let out = block_on(d.dispatch(&raw(&cc, &vat)));
        prop_assert_eq!(out.clone(), ValidationOutcome::UnsupportedJurisdiction { country_code: cc });
        prop_assert_eq!(ApiResponse::from_outcome(&out).status, 501);
        prop_assert_eq!(total_calls(&backends), 0);
    }

    #[test]
    fn format_mismatch_never_reaches_backend(
        cc in registered_country(),
        vat in "[a-z ]{1,14}",
    ) {
        let (d, backends) = setup(Some(true));
        let out = block_on(d.dispatch(&raw(&cc, &vat)));
        let is_format_error = matches!(out, ValidationOutcome::Invalid(InvalidReason::Format { .. }));
        prop_assert!(is_format_error);
        prop_assert_eq!(ApiResponse::from_outcome(&out).status, 400);
        prop_assert_eq!(total_calls(&backends), 0);
    }

    #[test]
    fn backend_true_is_200_validated((cc, vat) in well_formed_pair()) {
        let (d, backends) = setup(Some(true));
        let r = ApiResponse::from_outcome(&block_on(d.dispatch(&raw(&cc, &vat))));
        prop_assert_eq!(r.status, 200);
        let validated = matches!(r.body, ResponseBody::Verdict { validated: true, .. });
        prop_assert!(validated);
        prop_assert_eq!(total_calls(&backends), 1);
    }

    #[test]
    fn backend_false_is_200_not_validated((cc, vat) in well_formed_pair()) {
        let (d, _) = setup(Some(false));
        let r = ApiResponse::from_outcome(&block_on(d.dispatch(&raw(&cc, &vat))));
        prop_assert_eq!(r.status, 200);
        let rejected = matches!(r.body, ResponseBody::Verdict { validated: false, .. });
        prop_assert!(rejected);
    }

    #[test]
    fn backend_error_is_500((cc, vat) in well_formed_pair()) {
        let (d, backends) = setup(None);
        let r = ApiResponse::from_outcome(&block_on(d.dispatch(&raw(&cc, &vat))));
        prop_assert_eq!(r.status, 500);
        prop_assert_eq!(total_calls(&backends), 1);
    }
}
