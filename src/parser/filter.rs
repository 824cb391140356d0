use super::validate_candidate;
use crate::error::ParamError;
use crate::spec::FilterSpec;
use serde_json::{Map, Value};
use tracing::debug;

/// Parse and validate the `filter` parameter, merging server-side defaults.
///
/// `query` is the full query-parameter mapping; an entirely absent mapping
/// (no query string on the request at all) fails with `MissingArgument`,
/// while a present mapping without a `filter` key validates `{}` against the
/// schema. Defaults are merged after validation: explicit input wins over a
/// same-key default, defaults fill in keys the input omitted.
pub fn parse_filter(
    query: Option<&Map<String, Value>>,
    spec: &FilterSpec,
) -> Result<Map<String, Value>, ParamError> {
    let params = query.ok_or_else(|| {
        ParamError::missing("query parameters are required for filter parsing")
    })?;

    let candidate: Map<String, Value> = match params.get("filter") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(ParamError::external(
                "the 'filter' parameter must map filter names to values",
            ))
        }
    };

    let mut output = validate_candidate(&spec.schema, &candidate, "filter")?;

    let mut defaulted = 0usize;
    for (key, value) in &spec.defaults {
        if !output.contains_key(key) {
            output.insert(key.clone(), value.clone());
            defaulted += 1;
        }
    }

    debug!(
        filter_count = output.len(),
        defaulted = defaulted,
        "filter parameters parsed"
    );
    Ok(output)
}
