//! Request description and signed URL construction.

use crate::error::Error;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Monitoring API resource.
pub const MONITOR_URI: &str = "monitor/1.0";
pub const LOCATIONS_URI: &str = "/locations";
pub const SUMMARY_URI: &str = "/summary";
pub const AGGREGATE_URI: &str = "/aggregate";
pub const SAMPLES_URI: &str = "/sample";

/// Alerting API resource.
pub const ALERT_URI: &str = "alert/1.0";
pub const POLICY_URI: &str = "/policy";

/// Scripting API resource.
pub const SCRIPT_URI: &str = "script/1.0";

/// Instant test API resource.
pub const INSTANT_TEST_URI: &str = "tools/instanttest/1.0";

/// One API call before it is signed: method, resource path, endpoint query and
/// optional JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: String::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, Error> {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, Error> {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Encode `params` as the endpoint part of the query string.
    pub fn with_query<P: Serialize>(mut self, params: &P) -> Result<Self, Error> {
        self.query = serde_urlencoded::to_string(params)
            .map_err(|e| Error::Other(format!("Cannot encode query parameters: {}", e)))?;
        Ok(self)
    }
}

/// Join the base URL and resource path, then append the endpoint query
/// followed by `apikey` and `sig`.
///
/// Path segments are used verbatim; ids containing `/`, `?` or `#` change the
/// resulting URL.
pub fn build_url(
    base_url: &str,
    resource_path: &str,
    query: &str,
    key: &str,
    signature: &str,
) -> Result<Url, Error> {
    let mut url = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        resource_path.trim_start_matches('/')
    );
    url.push('?');
    if !query.is_empty() {
        url.push_str(query);
        url.push('&');
    }
    url.push_str(&format!(
        "apikey={}&sig={}",
        urlencoding::encode(key),
        urlencoding::encode(signature)
    ));
    Ok(Url::parse(&url)?)
}
