use crate::error::ParamError;
use crate::spec::{FieldSpec, FieldsetsSpec};
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use tracing::debug;

/// Ordered fieldset values for one type (stack-allocated for ≤8 values).
pub type FieldVec = SmallVec<[String; 8]>;

/// Parse the sparse-fieldset parameter against the allow-list contract.
///
/// `raw` is the `fields` entry of the query-parameter mapping: a mapping from
/// type name to a comma-separated value string, or absent. The result maps
/// each supplied type to its values in comma order; duplicates are preserved
/// as given.
///
/// Allow-list membership is always judged before value-domain validity: a
/// request naming an undeclared type fails with `OptionNotAllowed` regardless
/// of what values it carries. Required types missing from the input fail with
/// `MissingArgument`, after all supplied types have been processed.
pub fn parse_fieldsets(
    raw: Option<&Value>,
    spec: &FieldsetsSpec,
) -> Result<BTreeMap<String, FieldVec>, ParamError> {
    let mut parsed: BTreeMap<String, FieldVec> = BTreeMap::new();

    match raw {
        None | Some(Value::Null) => {}
        Some(Value::Object(supplied)) => {
            for (type_name, raw_value) in supplied {
                let field_spec = spec.allowed.get(type_name).ok_or_else(|| {
                    ParamError::option_not_allowed(format!(
                        "fieldset type '{}' is not declared for this endpoint",
                        type_name
                    ))
                })?;

                let raw_str = raw_value.as_str().ok_or_else(|| {
                    ParamError::external(format!(
                        "fieldset '{}' must be a comma-separated string",
                        type_name
                    ))
                })?;

                let values: FieldVec = raw_str
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|s| s.trim().to_string())
                    .collect();

                match field_spec {
                    FieldSpec::Unrestricted => {}
                    FieldSpec::Enumerated(allowed) => {
                        for value in &values {
                            if !allowed.contains(value) {
                                return Err(ParamError::external(format!(
                                    "value '{}' is not allowed for fieldset '{}' (allowed: {})",
                                    value,
                                    type_name,
                                    allowed.join(", ")
                                )));
                            }
                        }
                    }
                    FieldSpec::Malformed(_) => {
                        return Err(ParamError::internal(format!(
                            "fieldset '{}' has a malformed allowed-value specification: \
                             expected `true` or an array of strings",
                            type_name
                        )));
                    }
                }

                parsed.insert(type_name.clone(), values);
            }
        }
        Some(_) => {
            return Err(ParamError::external(
                "the 'fields' parameter must map type names to comma-separated strings",
            ));
        }
    }

    for required in &spec.required {
        if !parsed.contains_key(required) {
            return Err(ParamError::missing(format!(
                "required fieldset type '{}' was not supplied",
                required
            )));
        }
    }

    debug!(fieldset_count = parsed.len(), "fieldsets parsed");
    Ok(parsed)
}
