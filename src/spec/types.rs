use crate::schema::SchemaValidator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Allowed-value specification for one fieldset type.
///
/// Built from the loose configuration document: the literal `true` means any
/// value is accepted, an array of strings is a closed enumeration, and
/// anything else is carried as [`FieldSpec::Malformed`] so the fieldsets
/// parser can classify it as a server bug at parse time rather than a client
/// fault.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    /// Accept any comma-separated string, no enumeration check
    Unrestricted,
    /// Accept only values from this closed set
    Enumerated(Vec<String>),
    /// Server left something that is neither `true` nor an enumeration
    Malformed(Value),
}

impl FieldSpec {
    /// Enumeration from anything yielding string-likes, preserving order.
    pub fn enumerated<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldSpec::Enumerated(values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSpec::Unrestricted => write!(f, "Unrestricted"),
            FieldSpec::Enumerated(values) => write!(f, "Enumerated({})", values.join(",")),
            FieldSpec::Malformed(_) => write!(f, "Malformed"),
        }
    }
}

/// Structural convention for the decoded request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyConvention {
    /// Attributes nested under `data.attributes` (the default)
    #[default]
    #[serde(rename = "jsonapi")]
    JsonApi,
    /// Attributes at the top level of the decoded document
    Json,
}

impl fmt::Display for BodyConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyConvention::JsonApi => write!(f, "jsonapi"),
            BodyConvention::Json => write!(f, "json"),
        }
    }
}

/// Schema contract for one parameter group.
///
/// Either an inline JSON Schema document (compiled and cached by the bundled
/// [`crate::schema::JsonSchemaEngine`]) or a pre-built validation capability.
/// Inline documents are carried unchecked; well-formedness is judged when the
/// owning parser runs, so a misconfigured schema surfaces as
/// [`crate::ParamError::InternalArgument`] instead of a panic at build time.
#[derive(Clone)]
pub enum SchemaSpec {
    /// Inline JSON Schema document
    Inline(Value),
    /// External validation capability
    Capability(Arc<dyn SchemaValidator>),
}

impl SchemaSpec {
    pub fn inline(document: Value) -> Self {
        SchemaSpec::Inline(document)
    }

    pub fn capability(validator: Arc<dyn SchemaValidator>) -> Self {
        SchemaSpec::Capability(validator)
    }
}

impl fmt::Debug for SchemaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSpec::Inline(doc) => f.debug_tuple("Inline").field(doc).finish(),
            SchemaSpec::Capability(_) => f.debug_tuple("Capability").field(&"..").finish(),
        }
    }
}

/// Sparse-fieldset contract: which types a client may request fields for,
/// the value domain per type, and which types must always be supplied.
#[derive(Debug, Clone, Default)]
pub struct FieldsetsSpec {
    /// Type name to allowed-value specification
    pub allowed: BTreeMap<String, FieldSpec>,
    /// Type names that must be present in every request, in declaration order
    pub required: Vec<String>,
}

/// Request-body contract.
#[derive(Debug, Clone)]
pub struct BodySpec {
    /// Where the candidate attributes live in the decoded document
    pub convention: BodyConvention,
    /// Contract the candidate must satisfy
    pub schema: SchemaSpec,
}

impl BodySpec {
    /// Body contract with the default `jsonapi` convention.
    pub fn new(schema: SchemaSpec) -> Self {
        BodySpec {
            convention: BodyConvention::default(),
            schema,
        }
    }

    pub fn with_convention(mut self, convention: BodyConvention) -> Self {
        self.convention = convention;
        self
    }
}

/// Filter contract: schema plus server-side defaults merged into the
/// validated output (explicit input always wins over a same-key default).
#[derive(Debug, Clone)]
pub struct FilterSpec {
    pub schema: SchemaSpec,
    pub defaults: Map<String, Value>,
}

impl FilterSpec {
    pub fn new(schema: SchemaSpec) -> Self {
        FilterSpec {
            schema,
            defaults: Map::new(),
        }
    }

    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }
}

/// Contract for the non-reserved top-level query parameters.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub schema: SchemaSpec,
}

impl QuerySpec {
    pub fn new(schema: SchemaSpec) -> Self {
        QuerySpec { schema }
    }
}

/// Per-endpoint parameter contract.
///
/// Built once when the endpoint is defined, then shared read-only across
/// every request the endpoint serves. A group left `None` is undeclared;
/// asking the facade for an undeclared group is a server bug and fails with
/// [`crate::ParamError::InternalArgument`].
#[derive(Debug, Clone, Default)]
pub struct ParamsSpec {
    pub fieldsets: Option<FieldsetsSpec>,
    pub body: Option<BodySpec>,
    pub filter: Option<FilterSpec>,
    pub query: Option<QuerySpec>,
}

impl ParamsSpec {
    /// Start a fluent builder for a new contract.
    #[must_use]
    pub fn builder() -> super::ParamsSpecBuilder {
        super::ParamsSpecBuilder::new()
    }
}
