//! # paramgate
//!
//! **paramgate** is a request-parameter extraction and validation layer for
//! JSON-oriented HTTP APIs. Given an inbound request and a declarative
//! per-endpoint contract, it extracts four independently configured
//! parameter groups (sparse fieldsets, request body, filter parameters and
//! query parameters), validates each against the contract, and hands the
//! handler a normalized, typed mapping. Disallowed or malformed input is
//! rejected with a precisely classified error: client faults map to 400,
//! server misconfiguration to 500.
//!
//! ## Architecture
//!
//! - **[`spec`]** - immutable per-endpoint contracts (`ParamsSpec`), built
//!   with a fluent builder or from a loose JSON document
//! - **[`parser`]** - the four group parsers (fieldsets, body, filter, query)
//! - **[`params`]** - the per-request facade with lazy, memoized accessors
//! - **[`schema`]** - the `SchemaValidator` capability trait, the bundled
//!   `jsonschema`-backed engine, and the compiled-validator cache
//! - **[`request`]** - the `RawRequest` view trait and a bundled
//!   `ParsedRequest` implementation
//! - **[`error`]** - the closed `ParamError` taxonomy
//! - **[`runtime_config`]** - `PARAMGATE_*` environment switches
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use paramgate::{
//!     BodySpec, FieldSpec, ParamsSpec, ParsedRequest, RequestParams, SchemaSpec,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! // Declared once, when the endpoint is defined
//! let spec = Arc::new(
//!     ParamsSpec::builder()
//!         .required_fieldset("posts", FieldSpec::enumerated(["title", "body"]))
//!         .body(BodySpec::new(SchemaSpec::inline(json!({
//!             "type": "object",
//!             "properties": { "title": { "type": "string" } },
//!             "required": ["title"]
//!         }))))
//!         .build(),
//! );
//!
//! // Per request
//! let request = ParsedRequest::new(
//!     Method::POST,
//!     "/posts?fields[posts]=title,body",
//!     vec![("Content-Type", "application/json")],
//!     Some(r#"{"data": {"attributes": {"title": "hello"}}}"#.to_string()),
//! );
//! let params = RequestParams::new(request, spec);
//!
//! let fieldsets = params.fieldsets_params().unwrap();
//! assert_eq!(
//!     fieldsets["posts"].as_slice(),
//!     ["title".to_string(), "body".to_string()].as_slice(),
//! );
//!
//! let body = params.body_params().unwrap();
//! assert_eq!(body["title"], json!("hello"));
//! ```

pub mod error;
pub mod params;
pub mod parser;
pub mod request;
pub mod runtime_config;
pub mod schema;
pub mod spec;

pub use error::ParamError;
pub use params::RequestParams;
pub use parser::FieldVec;
pub use request::{ParsedRequest, RawRequest};
pub use schema::{JsonSchemaEngine, SchemaValidator, ValidationOutcome, ValidatorCache};
pub use spec::{
    BodyConvention, BodySpec, FieldSpec, FieldsetsSpec, FilterSpec, ParamsSpec, ParamsSpecBuilder,
    QuerySpec, SchemaSpec,
};
