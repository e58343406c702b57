//! Error types for the Neustar API client.

use serde_json::Value;
use thiserror::Error;

/// Base error type for Neustar operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The per-call deadline elapsed before the response arrived.
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// A 2xx body did not match the shape the caller asked for.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    Validation(#[from] ValidationError),

    /// Raised by [`crate::Outcome::into_result`] for non-2xx responses.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e)
        } else {
            Error::Transport(e)
        }
    }
}

/// An input value outside one of the service's enumerated sets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{value:?} is not a valid {field}. Must be one of: {allowed}")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub allowed: String,
}

impl ValidationError {
    pub fn new(field: &'static str, value: impl ToString, allowed: impl Into<String>) -> Self {
        Self {
            field,
            value: value.to_string(),
            allowed: allowed.into(),
        }
    }
}

/// A non-2xx response from the API.
///
/// The service reports failures as `{"message", "code", "param"}`, either at the
/// top level or nested under `error`/`errors`. Decoding is best effort: when the
/// body is empty or not JSON only the status is known.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (status {status_code})")]
pub struct ApiError {
    pub message: String,
    pub status_code: u16,
    pub code: Option<String>,
    pub param: Option<String>,
    pub response_data: Option<Value>,
}

impl ApiError {
    pub fn new(
        message: impl Into<String>,
        status_code: u16,
        response_data: Option<Value>,
    ) -> Self {
        Self {
            message: message.into(),
            status_code,
            code: None,
            param: None,
            response_data,
        }
    }

    /// Build from a raw error response body.
    pub fn from_body(status_code: u16, body: &str) -> Self {
        let data: Option<Value> = serde_json::from_str(body).ok();
        let detail = data.as_ref().and_then(error_detail);
        let field = |name: &str| {
            detail
                .and_then(|d| d.get(name))
                .and_then(|v| match v {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
        };
        let code = field("code");
        let param = field("param");
        let message = field("message")
            .or_else(|| {
                code.as_deref()
                    .and_then(describe_error_code)
                    .map(String::from)
            })
            .unwrap_or_else(|| format!("API request failed with status {}", status_code));
        Self {
            message,
            status_code,
            code,
            param,
            response_data: data,
        }
    }
}

fn error_detail(data: &Value) -> Option<&Value> {
    if let Some(e) = data.get("error").filter(|e| e.is_object()) {
        return Some(e);
    }
    if let Some(first) = data
        .get("errors")
        .and_then(|e| e.as_array())
        .and_then(|a| a.first())
    {
        return Some(first);
    }
    if let Some(e) = data.get("data").and_then(|d| d.get("error")) {
        return Some(e);
    }
    data.get("message").or_else(|| data.get("code")).map(|_| data)
}

const MONITORING_ERROR_CODES: [(&str, &str); 13] = [
    ("MON_0000", "Resource :resource not available"),
    ("MON_0001", "Item with Id :itemid not found"),
    ("MON_0002", "Duplicate name :name found."),
    ("MON_0003", ":missingfield is/are required fields"),
    ("MON_0004", ":value is an invalid value."),
    ("MON_0005", ":value is an invalid value type. Type :valuetype expected"),
    ("MON_0006", ":field is an invalid field"),
    ("MON_0007", "Valid :field id not supplied"),
    ("MON_0008", "Empty body received in POST"),
    ("MON_0009", "Empty body received in PUT"),
    ("MON_0010", "System cannot complete the request"),
    ("MON_0011", "User does not have permission to perform the action"),
    ("MON_9999", "An internal error has occured"),
];

const REAL_USER_MEASUREMENTS_ERROR_CODES: [(&str, &str); 7] = [
    ("RUM_000", "Request has been throttled"),
    ("RUM_001", "Database internal error"),
    ("RUM_002", "Generic internal error"),
    ("RUM_003", "Database found data inconsistencies"),
    ("RUM_004", "Generic Forbidden error"),
    ("RUM_005", "Mandatory parameter is missing"),
    ("RUM_006", "Parameter is not valid"),
];

/// Message template for a service error code (`MON_0001`, `RUM_005`, ...).
pub fn describe_error_code(code: &str) -> Option<&'static str> {
    MONITORING_ERROR_CODES
        .iter()
        .chain(REAL_USER_MEASUREMENTS_ERROR_CODES.iter())
        .find(|(c, _)| *c == code)
        .map(|(_, msg)| *msg)
}
