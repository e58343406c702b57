//! Scripting API: test scripts referenced by monitors.

use crate::client::{CallOptions, Client};
use crate::decode::{decode_items, decode_list, Outcome};
use crate::error::{Error, ValidationError};
use crate::request::{ApiRequest, SCRIPT_URI};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A test script. Monitors refer to it by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Script {
    pub id: String,
    pub version: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub account_id: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub last_user: Option<String>,
    pub in_use: bool,
    pub latest_version: Option<String>,
}

/// Body of the create script call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptCreateParameters {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Script source.
    pub script_body: String,
}

impl ScriptCreateParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", &self.name, "a non-empty name"));
        }
        if self.script_body.trim().is_empty() {
            return Err(ValidationError::new(
                "scriptBody",
                "",
                "a non-empty script body",
            ));
        }
        Ok(())
    }
}

pub struct Scripting<'a> {
    client: &'a Client,
    options: CallOptions,
}

impl<'a> Scripting<'a> {
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

    /// Upload a new script.
    pub async fn create(&self, params: &ScriptCreateParameters) -> Result<Outcome<Script>, Error> {
        params.validate()?;
        let req = ApiRequest::post(SCRIPT_URI, params)?;
        self.client.fetch(req, self.options, decode_items).await
    }

    /// Scripts on the account.
    pub async fn list(&self) -> Result<Outcome<Vec<Script>>, Error> {
        let req = ApiRequest::get(SCRIPT_URI);
        self.client.fetch(req, self.options, decode_list).await
    }
}
