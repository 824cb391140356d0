use super::validate_candidate;
use crate::error::ParamError;
use crate::spec::QuerySpec;
use serde_json::{Map, Value};
use tracing::debug;

/// Top-level query keys owned by other parameter groups, excluded from the
/// query candidate before validation.
pub const RESERVED_QUERY_KEYS: [&str; 2] = ["fields", "filter"];

/// Parse and validate the non-reserved top-level query parameters.
///
/// An entirely absent query-parameter mapping fails with `MissingArgument`.
/// Keys claimed by the fieldsets and filter groups are stripped before the
/// remainder is validated against the query schema.
pub fn parse_query(
    query: Option<&Map<String, Value>>,
    spec: &QuerySpec,
) -> Result<Map<String, Value>, ParamError> {
    let params = query
        .ok_or_else(|| ParamError::missing("query parameters are required for query parsing"))?;

    let candidate: Map<String, Value> = params
        .iter()
        .filter(|(key, _)| !RESERVED_QUERY_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let output = validate_candidate(&spec.schema, &candidate, "query")?;
    debug!(param_count = output.len(), "query parameters parsed");
    Ok(output)
}
