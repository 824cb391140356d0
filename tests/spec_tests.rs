#![allow(clippy::unwrap_used, clippy::expect_used)]

use paramgate::{BodyConvention, FieldSpec, ParamError, ParamsSpec, SchemaSpec};
use serde_json::json;

#[test]
fn test_builder_collects_fieldsets_and_required_order() {
    let spec = ParamsSpec::builder()
        .required_fieldset("posts", FieldSpec::enumerated(["foo", "bar"]))
        .required_fieldset("authors", FieldSpec::Unrestricted)
        .fieldset("tags", FieldSpec::Unrestricted)
        .build();

    let fieldsets = spec.fieldsets.unwrap();
    assert_eq!(fieldsets.allowed.len(), 3);
    assert_eq!(fieldsets.required, vec!["posts", "authors"]);
}

#[test]
fn test_builder_does_not_duplicate_required_entries() {
    let spec = ParamsSpec::builder()
        .required_fieldset("posts", FieldSpec::Unrestricted)
        .required_fieldset("posts", FieldSpec::Unrestricted)
        .build();
    assert_eq!(spec.fieldsets.unwrap().required, vec!["posts"]);
}

#[test]
fn test_builder_groups_default_to_undeclared() {
    let spec = ParamsSpec::builder().build();
    assert!(spec.fieldsets.is_none());
    assert!(spec.body.is_none());
    assert!(spec.filter.is_none());
    assert!(spec.query.is_none());
}

#[test]
fn test_from_value_maps_allowed_value_shapes() {
    let spec = ParamsSpec::from_value(json!({
        "fieldsets": {
            "allowed": {
                "posts": ["foo", "bar"],
                "tags": true,
                "broken": {"oops": 1}
            },
            "required": ["posts"]
        }
    }))
    .unwrap();

    let fieldsets = spec.fieldsets.unwrap();
    assert_eq!(
        fieldsets.allowed["posts"],
        FieldSpec::Enumerated(vec!["foo".to_string(), "bar".to_string()])
    );
    assert_eq!(fieldsets.allowed["tags"], FieldSpec::Unrestricted);
    assert!(matches!(
        fieldsets.allowed["broken"],
        FieldSpec::Malformed(_)
    ));
    assert_eq!(fieldsets.required, vec!["posts"]);
}

#[test]
fn test_from_value_parses_body_convention_and_default() {
    let spec = ParamsSpec::from_value(json!({
        "body": { "convention": "json", "schema": { "type": "object" } }
    }))
    .unwrap();
    assert_eq!(spec.body.unwrap().convention, BodyConvention::Json);

    let spec = ParamsSpec::from_value(json!({
        "body": { "schema": { "type": "object" } }
    }))
    .unwrap();
    let body = spec.body.unwrap();
    assert_eq!(body.convention, BodyConvention::JsonApi);
    assert!(matches!(body.schema, SchemaSpec::Inline(_)));
}

#[test]
fn test_from_value_parses_filter_defaults() {
    let spec = ParamsSpec::from_value(json!({
        "filter": {
            "schema": { "type": "object" },
            "defaults": { "state": "published", "limit": 20 }
        }
    }))
    .unwrap();

    let filter = spec.filter.unwrap();
    assert_eq!(filter.defaults["state"], json!("published"));
    assert_eq!(filter.defaults["limit"], json!(20));
}

#[test]
fn test_from_value_rejects_non_object_document() {
    let err = ParamsSpec::from_value(json!("not an object")).unwrap_err();
    assert!(matches!(err, ParamError::InternalArgument { .. }), "{err}");
}

#[test]
fn test_from_value_rejects_unknown_group() {
    let err = ParamsSpec::from_value(json!({"headers": {}})).unwrap_err();
    assert!(matches!(err, ParamError::InternalArgument { .. }), "{err}");
}

#[test]
fn test_from_value_rejects_missing_schema() {
    for group in ["body", "filter", "query"] {
        let err = ParamsSpec::from_value(json!({ group: {} })).unwrap_err();
        assert!(matches!(err, ParamError::InternalArgument { .. }), "{err}");
    }
}

#[test]
fn test_from_value_rejects_invalid_convention() {
    let err = ParamsSpec::from_value(json!({
        "body": { "convention": "xml", "schema": { "type": "object" } }
    }))
    .unwrap_err();
    assert!(matches!(err, ParamError::InternalArgument { .. }), "{err}");
}

#[test]
fn test_from_value_rejects_non_array_required() {
    let err = ParamsSpec::from_value(json!({
        "fieldsets": { "allowed": {}, "required": "posts" }
    }))
    .unwrap_err();
    assert!(matches!(err, ParamError::InternalArgument { .. }), "{err}");
}
