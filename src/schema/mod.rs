//! Schema-validation capability: the [`SchemaValidator`] trait the parsers
//! consume, the bundled `jsonschema`-backed [`JsonSchemaEngine`], and the
//! content-hash keyed [`ValidatorCache`] that amortizes compilation.

mod cache;
mod engine;

pub use cache::ValidatorCache;
pub use engine::{JsonSchemaEngine, SchemaValidator, ValidationOutcome};
