//! Response envelopes, decoding, and the tagged call outcome.
//!
//! List endpoints wrap results as `{"data": {"items": [...], "count": N,
//! "offset": N, "more": bool}}`. Single-object endpoints answer with
//! `{"data": {...}}`, `{"data": {"items": {...}}}` or the bare object. The
//! caller picks the shape; nothing is sniffed.

use crate::error::{ApiError, Error};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// `{"data": T}`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// `{"items": T}`
#[derive(Debug, Clone, Deserialize)]
pub struct Items<T> {
    pub items: T,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    /// More results exist past `offset + items.len()`.
    #[serde(default)]
    pub more: Option<bool>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            count: None,
            offset: None,
            more: None,
        }
    }
}

/// Decode a bare JSON object.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    Ok(serde_json::from_str(body)?)
}

/// Decode `{"data": T}`.
pub fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    decode::<Envelope<T>>(body).map(|e| e.data)
}

/// Decode `{"data": {"items": T}}`.
pub fn decode_items<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    decode_data::<Items<T>>(body).map(|i| i.items)
}

/// Decode the list envelope, keeping `count`/`offset`/`more`.
pub fn decode_page<T: DeserializeOwned>(body: &str) -> Result<Page<T>, Error> {
    decode_data::<Page<T>>(body)
}

/// Decode the list envelope, keeping only the items.
pub fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, Error> {
    decode_page::<T>(body).map(|p| p.items)
}

/// Result of a call that reached the service.
///
/// Transport failures are `Err(Error)`; anything the service answered is an
/// `Outcome`. A non-2xx status is `Rejected`, not an error, so callers see the
/// status explicitly (a delete of a missing monitor, for instance).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success { status: u16, value: T },
    Rejected(ApiError),
}

impl<T> Outcome<T> {
    pub fn status(&self) -> u16 {
        match self {
            Outcome::Success { status, .. } => *status,
            Outcome::Rejected(e) => e.status_code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// The value, if the call succeeded.
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success { value, .. } => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    /// Treat a rejection as [`Error::Api`].
    pub fn into_result(self) -> Result<T, Error> {
        match self {
            Outcome::Success { value, .. } => Ok(value),
            Outcome::Rejected(e) => Err(Error::Api(e)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success { status, value } => Outcome::Success {
                status,
                value: f(value),
            },
            Outcome::Rejected(e) => Outcome::Rejected(e),
        }
    }
}

/// Classify a raw response: decode 2xx bodies with `decode`, keep everything
/// else as a rejection with a best-effort error body.
pub(crate) fn classify<T>(
    status: u16,
    body: &str,
    decode: impl FnOnce(&str) -> Result<T, Error>,
) -> Result<Outcome<T>, Error> {
    if (200..300).contains(&status) {
        let value = decode(body)?;
        Ok(Outcome::Success { status, value })
    } else {
        Ok(Outcome::Rejected(ApiError::from_body(status, body)))
    }
}
