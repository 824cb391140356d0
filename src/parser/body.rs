use super::validate_candidate;
use crate::error::ParamError;
use crate::spec::{BodyConvention, BodySpec};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Parse and validate the request body against the body contract.
///
/// The body is mandatory whenever a body contract exists: absence or an
/// empty string fails with `MissingArgument`. The configured convention only
/// decides where the candidate attributes live in the decoded document:
/// `data.attributes` for `jsonapi`, the top level for `json`. The same
/// schema validates either way.
///
/// A body that is not valid JSON classifies as `SchemaValidation` with the
/// decode message under the `body` detail key; a `jsonapi` document without
/// `data.attributes` yields an empty candidate and lets the schema report
/// what is missing.
pub fn parse_body(raw_body: Option<&str>, spec: &BodySpec) -> Result<Map<String, Value>, ParamError> {
    let raw = match raw_body {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Err(ParamError::missing("request body is required")),
    };

    let document: Value = serde_json::from_str(raw).map_err(|e| {
        let mut detail = Map::new();
        detail.insert("body".to_string(), json!([format!("invalid JSON: {}", e)]));
        ParamError::schema_validation("request body is not valid JSON", detail)
    })?;

    let candidate: Map<String, Value> = match spec.convention {
        BodyConvention::JsonApi => document
            .pointer("/data/attributes")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        BodyConvention::Json => document.as_object().cloned().unwrap_or_default(),
    };

    debug!(
        convention = %spec.convention,
        attribute_count = candidate.len(),
        "body candidate extracted"
    );

    validate_candidate(&spec.schema, &candidate, "body")
}
