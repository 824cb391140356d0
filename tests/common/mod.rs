#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use http::Method;
use paramgate::{ParsedRequest, SchemaValidator, ValidationOutcome};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static TRACING_INIT: std::sync::Once = std::sync::Once::new();

/// Install a test subscriber once per binary; `RUST_LOG` filters output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// GET request with no headers and no body.
pub fn get(target: &str) -> ParsedRequest {
    init_tracing();
    ParsedRequest::new(Method::GET, target, Vec::<(&str, &str)>::new(), None)
}

/// POST request carrying a JSON body.
pub fn post(target: &str, body: &str) -> ParsedRequest {
    init_tracing();
    ParsedRequest::new(
        Method::POST,
        target,
        vec![("Content-Type", "application/json")],
        Some(body.to_string()),
    )
}

/// Schema used by most body/filter/query suites: a string `title`, an
/// integer `count`, nothing required unless stated otherwise.
pub fn attributes_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "count": { "type": "integer" }
        }
    })
}

/// Validation capability double that counts invocations.
///
/// Succeeds by echoing the candidate as its coerced output, or fails with a
/// fixed detail when constructed with `failing()`. The shared counter lets
/// tests verify the facade memoizes instead of re-validating.
pub struct CountingValidator {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl CountingValidator {
    pub fn new() -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let validator = Arc::new(Self {
            calls: Arc::clone(&calls),
            fail: false,
        });
        (validator, calls)
    }

    pub fn failing() -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let validator = Arc::new(Self {
            calls: Arc::clone(&calls),
            fail: true,
        });
        (validator, calls)
    }
}

impl SchemaValidator for CountingValidator {
    fn validate(&self, candidate: &Map<String, Value>) -> ValidationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            let mut errors = Map::new();
            errors.insert("title".to_string(), json!(["rejected by test double"]));
            ValidationOutcome::failed(errors)
        } else {
            ValidationOutcome::passed(candidate.clone())
        }
    }
}
