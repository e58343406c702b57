//! HTTP client for the Neustar Web Performance Management REST API.

use crate::alerting::Alerting;
use crate::decode::{classify, Outcome};
use crate::error::Error;
use crate::instant_testing::InstantTesting;
use crate::monitoring::Monitoring;
use crate::request::{build_url, ApiRequest};
use crate::scripting::Scripting;
use crate::signature::{sign, Clock, Credentials, SystemClock};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Production API root.
pub const API_BASE: &str = "http://api.neustar.biz/performance/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Per-call settings applied by a façade to every request it issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Deadline for the whole round trip. `None` uses the client default.
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Status and body of a response, read to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    clock: Arc<dyn Clock>,
}

impl ClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Point the client at another API root (a proxy, a stub server).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Default deadline for calls that don't set their own.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Time source for signatures.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        url::Url::parse(&self.base_url)?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|e| Error::Config(format!("Invalid user agent: {}", e)))?,
        );
        let http = HttpClient::builder().default_headers(headers).build()?;
        Ok(Client {
            credentials: Arc::new(self.credentials),
            base_url: self.base_url,
            timeout: self.timeout,
            clock: self.clock,
            http,
        })
    }
}

/// Neustar API client.
///
/// Cheap to clone; clones share the connection pool and the credentials.
#[derive(Clone)]
pub struct Client {
    credentials: Arc<Credentials>,
    base_url: String,
    timeout: Duration,
    clock: Arc<dyn Clock>,
    http: HttpClient,
}

impl Client {
    /// Create a client for the production API.
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        ClientBuilder::new(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> ClientBuilder {
        ClientBuilder::new(credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Monitors, samples, summaries and locations.
    pub fn monitoring(&self) -> Monitoring<'_> {
        Monitoring::new(self)
    }

    /// Alert policies.
    pub fn alerting(&self) -> Alerting<'_> {
        Alerting::new(self)
    }

    /// Test scripts.
    pub fn scripting(&self) -> Scripting<'_> {
        Scripting::new(self)
    }

    /// On-demand tests.
    pub fn instant_testing(&self) -> InstantTesting<'_> {
        InstantTesting::new(self)
    }

    /// Sign and send one request.
    ///
    /// Non-2xx answers are returned like any other; only a missing response is
    /// an error. Dropping the returned future cancels the request.
    pub async fn execute(
        &self,
        request: ApiRequest,
        options: CallOptions,
    ) -> Result<RawResponse, Error> {
        let signature = sign(&self.credentials, self.clock.as_ref());
        let url = build_url(
            &self.base_url,
            &request.path,
            &request.query,
            self.credentials.key(),
            &signature,
        )?;
        let mut req = self
            .http
            .request(request.method.clone(), url)
            .timeout(options.timeout.unwrap_or(self.timeout));
        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let started = Instant::now();
        let res = match req.send().await {
            Ok(res) => res,
            Err(e) => {
                tracing::debug!(
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    "request failed"
                );
                return Err(e.into());
            }
        };
        let status = res.status().as_u16();
        let body = res.text().await?;
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
        Ok(RawResponse { status, body })
    }

    /// Execute `request` and turn the response into an [`Outcome`], decoding
    /// 2xx bodies with `decode`.
    pub(crate) async fn fetch<T>(
        &self,
        request: ApiRequest,
        options: CallOptions,
        decode: impl FnOnce(&str) -> Result<T, Error>,
    ) -> Result<Outcome<T>, Error> {
        let raw = self.execute(request, options).await?;
        classify(raw.status, &raw.body, decode)
    }
}

fn default_user_agent() -> String {
    format!(
        "neustar-rs/{} ({}-{})",
        crate::VERSION,
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
