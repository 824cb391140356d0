use super::{
    BodyConvention, BodySpec, FieldSpec, FieldsetsSpec, FilterSpec, ParamsSpec, QuerySpec,
    SchemaSpec,
};
use crate::error::ParamError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Fluent builder for [`ParamsSpec`].
///
/// # Example
///
/// ```rust
/// use paramgate::{FieldSpec, FilterSpec, ParamsSpec, SchemaSpec};
/// use serde_json::json;
///
/// let spec = ParamsSpec::builder()
///     .required_fieldset("posts", FieldSpec::enumerated(["title", "body"]))
///     .fieldset("tags", FieldSpec::Unrestricted)
///     .filter(
///         FilterSpec::new(SchemaSpec::inline(json!({
///             "type": "object",
///             "properties": { "state": { "type": "string" } }
///         })))
///         .with_default("state", json!("published")),
///     )
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ParamsSpecBuilder {
    fieldsets: Option<FieldsetsSpec>,
    body: Option<BodySpec>,
    filter: Option<FilterSpec>,
    query: Option<QuerySpec>,
}

impl ParamsSpecBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a non-required fieldset type with its allowed-value spec.
    #[must_use]
    pub fn fieldset(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fieldsets
            .get_or_insert_with(FieldsetsSpec::default)
            .allowed
            .insert(name.into(), spec);
        self
    }

    /// Declare a fieldset type that every request must supply.
    #[must_use]
    pub fn required_fieldset(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let name = name.into();
        let fieldsets = self.fieldsets.get_or_insert_with(FieldsetsSpec::default);
        fieldsets.allowed.insert(name.clone(), spec);
        if !fieldsets.required.contains(&name) {
            fieldsets.required.push(name);
        }
        self
    }

    #[must_use]
    pub fn body(mut self, spec: BodySpec) -> Self {
        self.body = Some(spec);
        self
    }

    #[must_use]
    pub fn filter(mut self, spec: FilterSpec) -> Self {
        self.filter = Some(spec);
        self
    }

    #[must_use]
    pub fn query(mut self, spec: QuerySpec) -> Self {
        self.query = Some(spec);
        self
    }

    #[must_use]
    pub fn build(self) -> ParamsSpec {
        ParamsSpec {
            fieldsets: self.fieldsets,
            body: self.body,
            filter: self.filter,
            query: self.query,
        }
    }
}

impl ParamsSpec {
    /// Build a contract from a loose configuration document.
    ///
    /// Accepts the JSON shape a configuration file would carry:
    ///
    /// ```json
    /// {
    ///   "fieldsets": {
    ///     "allowed": { "posts": ["foo", "bar"], "tags": true },
    ///     "required": ["posts"]
    ///   },
    ///   "body": { "convention": "json", "schema": { "type": "object" } },
    ///   "filter": { "schema": { "type": "object" }, "defaults": { "state": "open" } },
    ///   "query": { "schema": { "type": "object" } }
    /// }
    /// ```
    ///
    /// Allowed-value shapes map to [`FieldSpec`] variants: `true` becomes
    /// `Unrestricted`, an array of strings becomes `Enumerated`, anything
    /// else is carried as `Malformed` and classified when the fieldsets
    /// parser runs. Only a non-object top-level document (or group entry) is
    /// rejected here, as server misconfiguration.
    pub fn from_value(document: Value) -> Result<Self, ParamError> {
        let root = match document {
            Value::Object(map) => map,
            other => {
                return Err(ParamError::internal(format!(
                    "params configuration must be a JSON object, got {}",
                    type_name(&other)
                )))
            }
        };

        let mut spec = ParamsSpec::default();
        for (key, value) in root {
            match key.as_str() {
                "fieldsets" => spec.fieldsets = Some(fieldsets_from_value(value)?),
                "body" => spec.body = Some(body_from_value(value)?),
                "filter" => spec.filter = Some(filter_from_value(value)?),
                "query" => spec.query = Some(query_from_value(value)?),
                other => {
                    return Err(ParamError::internal(format!(
                        "unknown parameter group '{}' in configuration",
                        other
                    )))
                }
            }
        }
        Ok(spec)
    }
}

fn as_object(value: Value, group: &str) -> Result<Map<String, Value>, ParamError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ParamError::internal(format!(
            "'{}' configuration must be a JSON object, got {}",
            group,
            type_name(&other)
        ))),
    }
}

fn fieldsets_from_value(value: Value) -> Result<FieldsetsSpec, ParamError> {
    let mut map = as_object(value, "fieldsets")?;

    let mut allowed = BTreeMap::new();
    if let Some(raw_allowed) = map.remove("allowed") {
        for (name, raw_spec) in as_object(raw_allowed, "fieldsets.allowed")? {
            allowed.insert(name, field_spec_from_value(raw_spec));
        }
    }

    let mut required = Vec::new();
    if let Some(raw_required) = map.remove("required") {
        let entries = match raw_required {
            Value::Array(entries) => entries,
            other => {
                return Err(ParamError::internal(format!(
                    "'fieldsets.required' must be an array of strings, got {}",
                    type_name(&other)
                )))
            }
        };
        for entry in entries {
            match entry {
                Value::String(name) => required.push(name),
                other => {
                    return Err(ParamError::internal(format!(
                        "'fieldsets.required' entries must be strings, got {}",
                        type_name(&other)
                    )))
                }
            }
        }
    }

    Ok(FieldsetsSpec { allowed, required })
}

fn field_spec_from_value(value: Value) -> FieldSpec {
    match value {
        Value::Bool(true) => FieldSpec::Unrestricted,
        Value::Array(entries) if entries.iter().all(Value::is_string) => FieldSpec::Enumerated(
            entries
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        // Carried, not rejected: the fieldsets parser reports this as a
        // server bug only if a request actually touches the type.
        other => FieldSpec::Malformed(other),
    }
}

fn body_from_value(value: Value) -> Result<BodySpec, ParamError> {
    let mut map = as_object(value, "body")?;
    let convention = match map.remove("convention") {
        None => BodyConvention::default(),
        Some(raw) => serde_json::from_value(raw).map_err(|e| {
            ParamError::internal(format!(
                "'body.convention' must be \"jsonapi\" or \"json\": {}",
                e
            ))
        })?,
    };
    let schema = map
        .remove("schema")
        .ok_or_else(|| ParamError::internal("'body' configuration is missing 'schema'"))?;
    Ok(BodySpec {
        convention,
        schema: SchemaSpec::Inline(schema),
    })
}

fn filter_from_value(value: Value) -> Result<FilterSpec, ParamError> {
    let mut map = as_object(value, "filter")?;
    let schema = map
        .remove("schema")
        .ok_or_else(|| ParamError::internal("'filter' configuration is missing 'schema'"))?;
    let defaults = match map.remove("defaults") {
        None => Map::new(),
        Some(raw) => as_object(raw, "filter.defaults")?,
    };
    Ok(FilterSpec {
        schema: SchemaSpec::Inline(schema),
        defaults,
    })
}

fn query_from_value(value: Value) -> Result<QuerySpec, ParamError> {
    let mut map = as_object(value, "query")?;
    let schema = map
        .remove("schema")
        .ok_or_else(|| ParamError::internal("'query' configuration is missing 'schema'"))?;
    Ok(QuerySpec {
        schema: SchemaSpec::Inline(schema),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
