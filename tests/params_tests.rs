#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::CountingValidator;
use paramgate::{
    FieldSpec, FilterSpec, ParamError, ParamsSpec, QuerySpec, RequestParams, SchemaSpec,
};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[test]
fn test_successful_parse_is_memoized() {
    let (validator, calls) = CountingValidator::new();
    let spec = Arc::new(
        ParamsSpec::builder()
            .filter(FilterSpec::new(SchemaSpec::capability(validator)))
            .build(),
    );
    let params = RequestParams::new(common::get("/posts?filter[state]=open"), spec);

    let first = params.filter_params().unwrap().clone();
    let second = params.filter_params().unwrap().clone();
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "validation ran more than once");
}

#[test]
fn test_memoized_accessor_returns_the_same_object() {
    let (validator, _calls) = CountingValidator::new();
    let spec = Arc::new(
        ParamsSpec::builder()
            .filter(FilterSpec::new(SchemaSpec::capability(validator)))
            .build(),
    );
    let params = RequestParams::new(common::get("/posts?filter[state]=open"), spec);

    let first = params.filter_params().unwrap();
    let second = params.filter_params().unwrap();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_failed_parse_re_raises_without_retry() {
    let (validator, calls) = CountingValidator::failing();
    let spec = Arc::new(
        ParamsSpec::builder()
            .filter(FilterSpec::new(SchemaSpec::capability(validator)))
            .build(),
    );
    let params = RequestParams::new(common::get("/posts?filter[state]=open"), spec);

    let first = params.filter_params().unwrap_err();
    let second = params.filter_params().unwrap_err();
    assert_eq!(first, second, "re-raise must be deterministic");
    assert_eq!(calls.load(Ordering::SeqCst), 1, "failed parse must not be retried");
}

#[test]
fn test_groups_fail_independently() {
    let spec = Arc::new(
        ParamsSpec::builder()
            .fieldset("posts", FieldSpec::enumerated(["foo"]))
            .filter(FilterSpec::new(SchemaSpec::inline(json!({
                "type": "object",
                "properties": { "state": { "type": "string" } }
            }))))
            .build(),
    );
    // `photos` is undeclared: fieldsets fail, filter still succeeds
    let params = RequestParams::new(
        common::get("/posts?fields[photos]=x&filter[state]=open"),
        spec,
    );

    assert!(matches!(
        params.fieldsets_params().unwrap_err(),
        ParamError::OptionNotAllowed { .. }
    ));
    let filter = params.filter_params().unwrap();
    assert_eq!(filter["state"], json!("open"));
}

#[test]
fn test_accessor_for_undeclared_group_is_internal_argument() {
    let spec = Arc::new(
        ParamsSpec::builder()
            .fieldset("posts", FieldSpec::Unrestricted)
            .build(),
    );
    let params = RequestParams::new(common::get("/posts?page=1"), spec);

    for err in [
        params.body_params().unwrap_err(),
        params.filter_params().unwrap_err(),
        params.query_params().unwrap_err(),
    ] {
        assert!(matches!(err, ParamError::InternalArgument { .. }), "{err}");
        assert!(!err.is_client_fault());
    }
}

#[test]
fn test_error_status_and_body_classification() {
    let spec = Arc::new(
        ParamsSpec::builder()
            .query(QuerySpec::new(SchemaSpec::inline(json!("broken"))))
            .fieldset("posts", FieldSpec::enumerated(["foo"]))
            .build(),
    );
    let params = RequestParams::new(common::get("/posts?fields[posts]=nope"), spec);

    let client_err = params.fieldsets_params().unwrap_err();
    assert_eq!(client_err.status(), http::StatusCode::BAD_REQUEST);
    assert!(client_err.is_client_fault());

    let server_err = params.query_params().unwrap_err();
    assert_eq!(server_err.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    // The misconfiguration message must not leak into the response body
    assert_eq!(
        server_err.response_body(),
        json!({ "error": "Internal Server Error" })
    );
}

#[test]
fn test_shared_spec_serves_multiple_requests() {
    let spec = Arc::new(
        ParamsSpec::builder()
            .fieldset("posts", FieldSpec::enumerated(["foo", "bar"]))
            .build(),
    );

    let a = RequestParams::new(common::get("/posts?fields[posts]=foo"), Arc::clone(&spec));
    let b = RequestParams::new(common::get("/posts?fields[posts]=bar"), Arc::clone(&spec));

    assert_eq!(
        a.fieldsets_params().unwrap()["posts"].as_slice(),
        ["foo".to_string()].as_slice()
    );
    assert_eq!(
        b.fieldsets_params().unwrap()["posts"].as_slice(),
        ["bar".to_string()].as_slice()
    );
}
