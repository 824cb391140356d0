use crate::error::ParamError;
use crate::parser::{parse_body, parse_fieldsets, parse_filter, parse_query, FieldVec};
use crate::request::RawRequest;
use crate::spec::ParamsSpec;
use once_cell::unsync::OnceCell;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error};

/// Per-request parameter facade.
///
/// Orchestrates the four parsers against one inbound request. Each accessor
/// parses lazily on first call and memoizes the outcome for the lifetime of
/// the request: a second call after success returns the cached mapping
/// without re-running validation, a second call after failure re-raises the
/// same error deterministically. The four groups are independent; a failure
/// in one never blocks another.
///
/// The contract is shared read-only (`Arc`), so concurrent requests against
/// the same endpoint need no locking: the only mutable state is this
/// per-request memo, which a single logical flow owns.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use paramgate::{FieldSpec, ParamsSpec, ParsedRequest, RequestParams};
/// use std::sync::Arc;
///
/// let spec = Arc::new(
///     ParamsSpec::builder()
///         .fieldset("posts", FieldSpec::enumerated(["title", "body"]))
///         .build(),
/// );
/// let request = ParsedRequest::new::<_, &str, &str>(
///     Method::GET,
///     "/posts?fields[posts]=title",
///     [],
///     None,
/// );
///
/// let params = RequestParams::new(request, spec);
/// let fieldsets = params.fieldsets_params().unwrap();
/// assert_eq!(fieldsets["posts"].as_slice(), ["title".to_string()].as_slice());
/// ```
pub struct RequestParams<R: RawRequest> {
    request: R,
    spec: Arc<ParamsSpec>,
    fieldsets: OnceCell<Result<BTreeMap<String, FieldVec>, ParamError>>,
    body: OnceCell<Result<Map<String, Value>, ParamError>>,
    filter: OnceCell<Result<Map<String, Value>, ParamError>>,
    query: OnceCell<Result<Map<String, Value>, ParamError>>,
}

impl<R: RawRequest> RequestParams<R> {
    pub fn new(request: R, spec: Arc<ParamsSpec>) -> Self {
        Self {
            request,
            spec,
            fieldsets: OnceCell::new(),
            body: OnceCell::new(),
            filter: OnceCell::new(),
            query: OnceCell::new(),
        }
    }

    /// The contract this request is being parsed against.
    #[must_use]
    pub fn spec(&self) -> &ParamsSpec {
        &self.spec
    }

    /// The underlying request view.
    pub fn request(&self) -> &R {
        &self.request
    }

    /// Sparse fieldsets: type name to ordered value sequence.
    pub fn fieldsets_params(&self) -> Result<&BTreeMap<String, FieldVec>, ParamError> {
        let outcome = self.fieldsets.get_or_init(|| {
            let spec = self.spec.fieldsets.as_ref().ok_or_else(|| {
                ParamError::internal("no fieldsets contract declared for this endpoint")
            })?;
            let raw = self.request.query_params().and_then(|q| q.get("fields"));
            parse_fieldsets(raw, spec)
        });
        report("fieldsets", outcome)
    }

    /// Validated, schema-coerced body attributes.
    pub fn body_params(&self) -> Result<&Map<String, Value>, ParamError> {
        let outcome = self.body.get_or_init(|| {
            let spec = self.spec.body.as_ref().ok_or_else(|| {
                ParamError::internal("no body contract declared for this endpoint")
            })?;
            parse_body(self.request.raw_body(), spec)
        });
        report("body", outcome)
    }

    /// Validated filter parameters with server defaults merged in.
    pub fn filter_params(&self) -> Result<&Map<String, Value>, ParamError> {
        let outcome = self.filter.get_or_init(|| {
            let spec = self.spec.filter.as_ref().ok_or_else(|| {
                ParamError::internal("no filter contract declared for this endpoint")
            })?;
            parse_filter(self.request.query_params(), spec)
        });
        report("filter", outcome)
    }

    /// Validated non-reserved top-level query parameters.
    pub fn query_params(&self) -> Result<&Map<String, Value>, ParamError> {
        let outcome = self.query.get_or_init(|| {
            let spec = self.spec.query.as_ref().ok_or_else(|| {
                ParamError::internal("no query contract declared for this endpoint")
            })?;
            parse_query(self.request.query_params(), spec)
        });
        report("query", outcome)
    }
}

/// Log the memoized outcome and convert it to a borrow-or-cloned-error form.
fn report<'a, T>(group: &str, outcome: &'a Result<T, ParamError>) -> Result<&'a T, ParamError> {
    match outcome {
        Ok(value) => {
            debug!(group = group, "parameter group available");
            Ok(value)
        }
        Err(e @ ParamError::InternalArgument { .. }) => {
            error!(group = group, error = %e, "server-side parameter misconfiguration");
            Err(e.clone())
        }
        Err(e) => {
            debug!(group = group, error = %e, "parameter group rejected");
            Err(e.clone())
        }
    }
}
