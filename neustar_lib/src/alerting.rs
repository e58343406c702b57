//! Alerting API: alert policies.

use crate::client::{CallOptions, Client};
use crate::decode::{decode, decode_list, Outcome};
use crate::error::{Error, ValidationError};
use crate::request::{ApiRequest, ALERT_URI, POLICY_URI};
use crate::validation::ensure_strikes;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body of the create policy call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlertPolicyParameters {
    pub name: String,
    /// Recipients, e.g. `["alert@mycompany.com", "me@example.com"]`.
    pub email_addresses: Vec<String>,
    /// Failed runs before the alert fires, one of [`crate::validation::STRIKES`].
    pub strikes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewAlertPolicyParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", &self.name, "a non-empty name"));
        }
        ensure_strikes(self.strikes)
    }
}

/// An alert policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertPolicy {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub email_addresses: Vec<String>,
    pub strikes: Option<u32>,
    /// Set on Advanced Alert Policies.
    pub advanced_edit: bool,
}

pub struct Alerting<'a> {
    client: &'a Client,
    options: CallOptions,
}

impl<'a> Alerting<'a> {
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

    /// Create an alert policy. The service echoes the policy back unwrapped.
    pub async fn create_policy(
        &self,
        params: &NewAlertPolicyParameters,
    ) -> Result<Outcome<AlertPolicy>, Error> {
        params.validate()?;
        let req = ApiRequest::post(policy_path(), params)?;
        self.client.fetch(req, self.options, decode).await
    }

    /// Policies, newest first.
    pub async fn list_policies(&self) -> Result<Outcome<Vec<AlertPolicy>>, Error> {
        let req = ApiRequest::get(policy_path());
        self.client.fetch(req, self.options, decode_list).await
    }
}

fn policy_path() -> String {
    format!("{}{}", ALERT_URI, POLICY_URI)
}
