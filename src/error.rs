use http::StatusCode;
use serde_json::{json, Map, Value};
use std::fmt;

/// Parameter extraction/validation error.
///
/// Every parser in this crate fails exclusively with a variant from this
/// closed set. The variants split into two classes: client input faults
/// (safe to surface as a 400 response) and server misconfiguration
/// ([`ParamError::InternalArgument`]), which must never be echoed verbatim
/// to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// A required raw input source is entirely absent.
    ///
    /// Raised when the request body is missing while a body contract exists,
    /// when the query-parameter set is unreachable while a filter or query
    /// contract exists, or when a required fieldset type was not supplied.
    MissingArgument {
        /// What was expected and not found
        message: String,
    },
    /// The client referenced a fieldset type the server never declared.
    OptionNotAllowed {
        /// The offending type name
        message: String,
    },
    /// A client-supplied value violates a well-formed server-declared domain.
    ExternalArgument {
        /// The offending value and the domain it violated
        message: String,
    },
    /// A candidate failed the schema-validation capability.
    SchemaValidation {
        /// Summary of the failure
        message: String,
        /// Field-level detail: dotted instance path to list of messages
        detail: Map<String, Value>,
    },
    /// The server configuration itself is malformed.
    ///
    /// A non-schema value declared as a schema, a fieldset value spec that is
    /// neither an enumeration nor the unrestricted sentinel, or handler code
    /// requesting a parameter group the endpoint never configured. This is a
    /// bug on the server side, not a client fault.
    InternalArgument {
        /// What was misconfigured
        message: String,
    },
}

impl ParamError {
    pub fn missing(message: impl Into<String>) -> Self {
        ParamError::MissingArgument {
            message: message.into(),
        }
    }

    pub fn option_not_allowed(message: impl Into<String>) -> Self {
        ParamError::OptionNotAllowed {
            message: message.into(),
        }
    }

    pub fn external(message: impl Into<String>) -> Self {
        ParamError::ExternalArgument {
            message: message.into(),
        }
    }

    pub fn schema_validation(message: impl Into<String>, detail: Map<String, Value>) -> Self {
        ParamError::SchemaValidation {
            message: message.into(),
            detail,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ParamError::InternalArgument {
            message: message.into(),
        }
    }

    /// HTTP status this error maps to: 400 for client faults, 500 for
    /// server misconfiguration.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.is_client_fault() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Whether the failure was caused by client input (safe to expose)
    /// rather than by server configuration.
    #[must_use]
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, ParamError::InternalArgument { .. })
    }

    /// JSON error body suitable for writing to the response.
    ///
    /// Client faults carry their message (and, for schema failures, the
    /// field-level details). Internal faults are masked; the message is for
    /// logs only.
    #[must_use]
    pub fn response_body(&self) -> Value {
        match self {
            ParamError::SchemaValidation { message, detail } => {
                json!({ "error": message, "details": detail })
            }
            ParamError::InternalArgument { .. } => {
                json!({ "error": "Internal Server Error" })
            }
            ParamError::MissingArgument { message }
            | ParamError::OptionNotAllowed { message }
            | ParamError::ExternalArgument { message } => {
                json!({ "error": message })
            }
        }
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::MissingArgument { message } => {
                write!(f, "missing argument: {}", message)
            }
            ParamError::OptionNotAllowed { message } => {
                write!(f, "option not allowed: {}", message)
            }
            ParamError::ExternalArgument { message } => {
                write!(f, "invalid argument: {}", message)
            }
            ParamError::SchemaValidation { message, detail } => {
                write!(f, "schema validation failed: {} ({} field(s))", message, detail.len())
            }
            ParamError::InternalArgument { message } => {
                write!(f, "parameter misconfiguration: {}", message)
            }
        }
    }
}

impl std::error::Error for ParamError {}
