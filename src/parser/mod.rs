//! The four parameter-group parsers.
//!
//! Each parser takes the relevant slice of the raw request plus its group's
//! static contract and either returns a canonical mapping or fails with a
//! [`crate::ParamError`]. No parser recovers from its own errors; failures
//! propagate unchanged to the facade caller.

mod body;
mod fieldsets;
mod filter;
mod query;

pub use body::parse_body;
pub use fieldsets::{parse_fieldsets, FieldVec};
pub use filter::parse_filter;
pub use query::{parse_query, RESERVED_QUERY_KEYS};

use crate::error::ParamError;
use crate::schema::{JsonSchemaEngine, SchemaValidator};
use crate::spec::SchemaSpec;
use serde_json::{Map, Value};

/// Run a candidate mapping through a group's schema contract.
///
/// Inline documents are checked for well-formedness and compiled first, so a
/// misconfigured schema classifies as `InternalArgument` before any client
/// input is judged; contract violations classify as `SchemaValidation` with
/// field-level detail.
pub(crate) fn validate_candidate(
    schema: &SchemaSpec,
    candidate: &Map<String, Value>,
    group: &str,
) -> Result<Map<String, Value>, ParamError> {
    let outcome = match schema {
        SchemaSpec::Inline(document) => {
            let engine = JsonSchemaEngine::new(document.clone())?.with_root_label(group);
            engine.validate(candidate)
        }
        SchemaSpec::Capability(validator) => validator.validate(candidate),
    };

    if outcome.success {
        Ok(outcome.output)
    } else {
        Err(ParamError::schema_validation(
            format!("{} parameters failed validation", group),
            outcome.errors.unwrap_or_default(),
        ))
    }
}
