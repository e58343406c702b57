//! Instant test API: one-shot tests outside the monitor schedule.

use crate::client::{CallOptions, Client};
use crate::decode::{decode_items, decode_list, Outcome};
use crate::error::{Error, ValidationError};
use crate::request::{ApiRequest, INSTANT_TEST_URI};
use crate::validation::ensure_locations;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Body of the create job call.
///
/// When `callback` is set the service POSTs the job status to it at every
/// stage of the test.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantTestParameters {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    /// Comma-separated location names; the service picks when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<String>,
}

impl InstantTestParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        if url::Url::parse(&self.url).is_err() {
            return Err(ValidationError::new("url", &self.url, "an absolute URL"));
        }
        if let Some(ref locations) = self.locations {
            ensure_locations(locations)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstantTestJobId {
    pub id: String,
}

/// A job with the result from each tested location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstantTestJob {
    pub id: String,
    pub url: Option<String>,
    pub status: Option<String>,
    pub locations: Vec<InstantTestLocationResult>,
}

/// The run of a job at one location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstantTestLocationResult {
    pub id: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    /// Milliseconds.
    pub duration: Option<f64>,
    pub response_code: Option<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct InstantTesting<'a> {
    client: &'a Client,
    options: CallOptions,
}

impl<'a> InstantTesting<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            options: CallOptions::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// Start a job and return its id.
    pub async fn create(
        &self,
        params: &InstantTestParameters,
    ) -> Result<Outcome<InstantTestJobId>, Error> {
        params.validate()?;
        let req = ApiRequest::post(INSTANT_TEST_URI, params)?;
        self.client.fetch(req, self.options, decode_items).await
    }

    /// A job and the state at every location.
    pub async fn get_job(&self, job_id: &str) -> Result<Outcome<Vec<InstantTestJob>>, Error> {
        let req = ApiRequest::get(format!("{}/{}", INSTANT_TEST_URI, job_id));
        self.client.fetch(req, self.options, decode_list).await
    }

    /// A job's run at one location.
    pub async fn get_job_by_location(
        &self,
        job_id: &str,
        location_id: &str,
    ) -> Result<Outcome<Vec<InstantTestLocationResult>>, Error> {
        let req = ApiRequest::get(format!("{}/{}/{}", INSTANT_TEST_URI, job_id, location_id));
        self.client.fetch(req, self.options, decode_list).await
    }
}
