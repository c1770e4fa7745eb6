use std::error::Error as StdError;
use std::fmt;

use crate::error_codes;

/// Boxed error used as the wrapped cause of an [`RpcError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Any code outside the predefined table
    Other(i64),
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => error_codes::INTERNAL_ERROR,
            JsonRpcErrorCode::Other(code) => *code,
        }
    }

    /// Map a raw numeric code back onto the table.
    pub fn from_code(code: i64) -> Self {
        match code {
            error_codes::PARSE_ERROR => JsonRpcErrorCode::ParseError,
            error_codes::INVALID_REQUEST => JsonRpcErrorCode::InvalidRequest,
            error_codes::METHOD_NOT_FOUND => JsonRpcErrorCode::MethodNotFound,
            error_codes::INVALID_PARAMS => JsonRpcErrorCode::InvalidParams,
            error_codes::INTERNAL_ERROR => JsonRpcErrorCode::InternalError,
            other => JsonRpcErrorCode::Other(other),
        }
    }

    /// Transport status a code asks for when nothing overrides it.
    ///
    /// Caller mistakes get a 4xx status; everything else is left to the
    /// transport default (500).
    pub fn transport_status(&self) -> Option<u16> {
        match self {
            JsonRpcErrorCode::ParseError
            | JsonRpcErrorCode::InvalidRequest
            | JsonRpcErrorCode::InvalidParams => Some(400),
            JsonRpcErrorCode::MethodNotFound => Some(404),
            JsonRpcErrorCode::InternalError | JsonRpcErrorCode::Other(_) => None,
        }
    }
}

/// Anything that can be reported as a JSON-RPC error object.
///
/// `message()` defaults to the `Display` output, which for [`RpcError`]
/// already includes the wrapped cause.
pub trait TypedError: StdError + Send + Sync {
    /// Numeric code from the fixed error table
    fn code(&self) -> i64;

    fn message(&self) -> String {
        self.to_string()
    }

    /// Transport status for this error, `None` leaves the transport default
    fn transport_status(&self) -> Option<u16> {
        JsonRpcErrorCode::from_code(self.code()).transport_status()
    }
}

/// Errors produced while resolving and invoking a method.
#[derive(Debug)]
pub enum RpcError {
    /// Free-form error with an explicit code
    Generic {
        message: String,
        code: i64,
        status: Option<u16>,
        cause: Option<BoxError>,
    },
    /// A parameter the handler requires was absent
    MissingParameter { name: String },
    /// The terminal path segment has no registered handler
    MethodNotFound {
        name: String,
        cause: Option<BoxError>,
    },
    /// A non-terminal path segment has no registered namespace
    NamespaceNotFound {
        name: String,
        cause: Option<BoxError>,
    },
}

impl RpcError {
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        RpcError::Generic {
            message: message.into(),
            code,
            status: None,
            cause: None,
        }
    }

    /// Wrap an arbitrary error, reusing its text as the message.
    pub fn from_error<E>(err: E, code: i64) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        RpcError::Generic {
            message: err.to_string(),
            code,
            status: None,
            cause: None,
        }
    }

    pub fn missing_param(name: impl Into<String>) -> Self {
        RpcError::MissingParameter { name: name.into() }
    }

    pub fn method_not_found(name: impl Into<String>) -> Self {
        RpcError::MethodNotFound {
            name: name.into(),
            cause: None,
        }
    }

    pub fn namespace_not_found(name: impl Into<String>) -> Self {
        RpcError::NamespaceNotFound {
            name: name.into(),
            cause: None,
        }
    }

    /// `Wrong input parameters` with the invalid-params code
    pub fn invalid_params() -> Self {
        Self::new("Wrong input parameters", error_codes::INVALID_PARAMS)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message, error_codes::INTERNAL_ERROR)
    }

    /// Attach a wrapped cause. Its text is appended to this error's message.
    ///
    /// Missing-parameter errors have no cause slot and are returned as is.
    pub fn with_cause<E>(mut self, err: E) -> Self
    where
        E: Into<BoxError>,
    {
        match &mut self {
            RpcError::Generic { cause, .. }
            | RpcError::MethodNotFound { cause, .. }
            | RpcError::NamespaceNotFound { cause, .. } => *cause = Some(err.into()),
            RpcError::MissingParameter { .. } => {}
        }
        self
    }

    /// Override the transport status of a generic error.
    pub fn with_status(mut self, new_status: u16) -> Self {
        if let RpcError::Generic { status, .. } = &mut self {
            *status = Some(new_status);
        }
        self
    }

    pub fn cause(&self) -> Option<&BoxError> {
        match self {
            RpcError::Generic { cause, .. }
            | RpcError::MethodNotFound { cause, .. }
            | RpcError::NamespaceNotFound { cause, .. } => cause.as_ref(),
            RpcError::MissingParameter { .. } => None,
        }
    }

    fn own_message(&self) -> String {
        match self {
            RpcError::Generic { message, .. } => message.clone(),
            RpcError::MissingParameter { name } => {
                format!("parameter {} expected but not found", name)
            }
            RpcError::MethodNotFound { name, .. } if name.is_empty() => {
                "method not found".to_string()
            }
            RpcError::MethodNotFound { name, .. } => format!("method \"{}\" not found", name),
            RpcError::NamespaceNotFound { name, .. } => format!("namespace {} not found", name),
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause() {
            Some(cause) => write!(f, "{}: {}", self.own_message(), cause),
            None => f.write_str(&self.own_message()),
        }
    }
}

impl StdError for RpcError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause().map(|c| c.as_ref() as &(dyn StdError + 'static))
    }
}

impl TypedError for RpcError {
    fn code(&self) -> i64 {
        match self {
            RpcError::Generic { code, .. } => *code,
            RpcError::MissingParameter { .. } => error_codes::INVALID_PARAMS,
            RpcError::MethodNotFound { .. } | RpcError::NamespaceNotFound { .. } => {
                error_codes::METHOD_NOT_FOUND
            }
        }
    }

    fn transport_status(&self) -> Option<u16> {
        if let RpcError::Generic {
            status: Some(status),
            ..
        } = self
        {
            return Some(*status);
        }
        JsonRpcErrorCode::from_code(self.code()).transport_status()
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::invalid_params().with_cause(err)
    }
}
