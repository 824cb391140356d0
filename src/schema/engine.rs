use crate::error::ParamError;
use crate::schema::ValidatorCache;
use jsonschema::Validator;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Result of running a candidate mapping through a validation capability.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationOutcome {
    /// Whether the candidate satisfied the contract
    pub success: bool,
    /// Field-level failure detail, present iff `success` is false:
    /// dotted instance path to list of messages
    pub errors: Option<Map<String, Value>>,
    /// Coerced candidate, meaningful iff `success` is true
    pub output: Map<String, Value>,
}

impl ValidationOutcome {
    pub fn passed(output: Map<String, Value>) -> Self {
        ValidationOutcome {
            success: true,
            errors: None,
            output,
        }
    }

    pub fn failed(errors: Map<String, Value>) -> Self {
        ValidationOutcome {
            success: false,
            errors: Some(errors),
            output: Map::new(),
        }
    }
}

/// Narrow capability interface over a schema-validation engine.
///
/// The parsers assume nothing about the engine beyond this contract, so any
/// conforming validation library can be substituted via
/// [`crate::SchemaSpec::Capability`].
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, candidate: &Map<String, Value>) -> ValidationOutcome;
}

/// Bundled [`SchemaValidator`] backed by the `jsonschema` crate.
///
/// Before validating, string raw values are coerced per the schema's declared
/// property types (`"5"` becomes integer 5 for an `integer` property,
/// comma-separated strings become typed arrays for `array` properties), so
/// query-string input can satisfy typed contracts. Validation failures are
/// collected into a mapping from dotted instance path to messages.
pub struct JsonSchemaEngine {
    schema: Value,
    validator: Arc<Validator>,
    root_label: String,
}

// Manual impl: the compiled `Validator` has no `Debug`
impl fmt::Debug for JsonSchemaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaEngine")
            .field("schema", &self.schema)
            .field("root_label", &self.root_label)
            .finish_non_exhaustive()
    }
}

impl JsonSchemaEngine {
    /// Compile `schema` against the process-wide validator cache.
    ///
    /// Fails with [`ParamError::InternalArgument`] when the document is not
    /// a JSON object or boolean, or does not compile. Both are server
    /// misconfiguration, never a client fault.
    pub fn new(schema: Value) -> Result<Self, ParamError> {
        Self::with_cache(schema, ValidatorCache::global())
    }

    /// Compile `schema` against a caller-supplied cache.
    pub fn with_cache(schema: Value, cache: &ValidatorCache) -> Result<Self, ParamError> {
        if !schema.is_object() && !schema.is_boolean() {
            return Err(ParamError::internal(format!(
                "schema must be a JSON object or boolean, got: {}",
                schema
            )));
        }
        let validator = cache.get_or_compile(&schema).ok_or_else(|| {
            ParamError::internal("declared schema document failed to compile")
        })?;
        Ok(Self {
            schema,
            validator,
            root_label: "body".to_string(),
        })
    }

    /// Label used for root-level validation errors (defaults to `"body"`).
    #[must_use]
    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    fn property_schema(&self, key: &str) -> Option<&Value> {
        self.schema.get("properties").and_then(|p| p.get(key))
    }
}

impl SchemaValidator for JsonSchemaEngine {
    fn validate(&self, candidate: &Map<String, Value>) -> ValidationOutcome {
        let coerced: Map<String, Value> = candidate
            .iter()
            .map(|(k, v)| (k.clone(), coerce_value(v, self.property_schema(k))))
            .collect();
        let instance = Value::Object(coerced);

        let mut errors: Map<String, Value> = Map::new();
        for err in self.validator.iter_errors(&instance) {
            let key = dotted_path(&err.instance_path().to_string(), &self.root_label);
            let messages = errors
                .entry(key)
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = messages {
                list.push(Value::String(err.to_string()));
            }
        }

        let coerced = match instance {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        if errors.is_empty() {
            ValidationOutcome::passed(coerced)
        } else {
            debug!(error_count = errors.len(), "schema validation failed");
            ValidationOutcome::failed(errors)
        }
    }
}

/// Convert a JSON-pointer instance path to the dotted form used in error
/// details: `/a/0/b` becomes `a.0.b`, the root pointer becomes `root_label`.
fn dotted_path(pointer: &str, root_label: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        root_label.to_string()
    } else {
        trimmed.replace('/', ".")
    }
}

/// Coerce a raw value toward the type its property schema declares.
///
/// Only strings are rewritten; values that already carry a JSON type are
/// passed through, and strings that fail to parse are left as strings for
/// the validator to reject with a precise message.
fn coerce_value(value: &Value, schema: Option<&Value>) -> Value {
    let raw = match value {
        Value::String(s) => s,
        other => return other.clone(),
    };
    let Some(ty) = schema.and_then(|s| s.get("type").and_then(Value::as_str)) else {
        return value.clone();
    };
    match ty {
        "array" => {
            let items_schema = schema.and_then(|s| s.get("items"));
            let parts = raw
                .split(',')
                .filter(|s| !s.is_empty())
                .map(|p| coerce_primitive(p.trim(), items_schema))
                .collect();
            Value::Array(parts)
        }
        _ => coerce_primitive(raw, schema),
    }
}

fn coerce_primitive(raw: &str, schema: Option<&Value>) -> Value {
    match schema.and_then(|s| s.get("type").and_then(Value::as_str)) {
        Some("integer") => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        Some("number") => raw
            .parse::<f64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        Some("boolean") => raw
            .parse::<bool>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        _ => Value::String(raw.to_string()),
    }
}
