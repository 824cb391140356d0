//! Per-endpoint parameter contracts.
//!
//! A [`ParamsSpec`] holds the declared rules for the four parameter groups:
//! sparse fieldsets, body, filter and query. It is built once when an
//! endpoint is defined (fluent [`ParamsSpecBuilder`] or loose
//! [`ParamsSpec::from_value`] document) and shared read-only across requests.

mod build;
mod types;

pub use build::ParamsSpecBuilder;
pub use types::{
    BodyConvention, BodySpec, FieldSpec, FieldsetsSpec, FilterSpec, ParamsSpec, QuerySpec,
    SchemaSpec,
};
