//! Monitoring API: monitors, samples, aggregates, summaries and locations.

use crate::client::{CallOptions, Client};
use crate::decode::{decode, decode_items, decode_list, decode_page, Outcome, Page};
use crate::error::{Error, ValidationError};
use crate::request::{
    ApiRequest, AGGREGATE_URI, LOCATIONS_URI, MONITOR_URI, SAMPLES_URI, SUMMARY_URI,
};
use crate::validation::{
    ensure_aggregate_frequency, ensure_aggregate_group_by, ensure_browser_type, ensure_locations,
    ensure_monitor_type, ensure_update_interval,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// A monitor as returned by list and get.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Monitor {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "bool_or_string")]
    pub active: Option<bool>,
    /// Minutes between runs.
    pub interval: Option<u32>,
    #[serde(deserialize_with = "list_or_csv")]
    pub locations: Vec<String>,
    pub alert_policy: Option<String>,
    pub test_script: Option<String>,
    pub browser: Option<String>,
    /// Network monitor type (`dns`, ...); empty for script-based monitors.
    #[serde(rename = "type")]
    pub monitor_type: Option<String>,
    pub dns_settings: Option<DnsSettings>,
    pub ping_settings: Option<PingSettings>,
    pub port_settings: Option<PortSettings>,
    pub smtp_settings: Option<SmtpSettings>,
    pub pop_settings: Option<PopSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DnsSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected_ips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PingSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmtpSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PopSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

/// Body of the create monitor call.
///
/// `name`, `interval` and `locations` are required; script-based monitors also
/// need `test_script`. Leave `monitor_type` unset for script-based monitors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMonitorParameters {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Minutes between runs, one of [`crate::validation::UPDATE_INTERVALS`].
    pub interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_script: Option<String>,
    /// Comma-separated location names.
    pub locations: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_policy: Option<String>,
    /// `IE` is available to Enterprise accounts only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub monitor_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_settings: Option<DnsSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping_settings: Option<PingSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pop_settings: Option<PopSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_settings: Option<PortSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp_settings: Option<SmtpSettings>,
}

impl CreateMonitorParameters {
    pub fn new(name: impl Into<String>, interval: u32, locations: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interval,
            locations: locations.into(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", &self.name, "a non-empty name"));
        }
        ensure_update_interval(self.interval)?;
        ensure_locations(&self.locations)?;
        if let Some(ref browser) = self.browser {
            ensure_browser_type(browser)?;
        }
        if let Some(ref t) = self.monitor_type {
            ensure_monitor_type(t)?;
        }
        Ok(())
    }
}

/// Body of the update monitor call. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMonitorParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl UpdateMonitorParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(interval) = self.interval {
            ensure_update_interval(interval)?;
        }
        if let Some(ref locations) = self.locations {
            ensure_locations(locations)?;
        }
        if let Some(ref browser) = self.browser {
            ensure_browser_type(browser)?;
        }
        Ok(())
    }
}

/// Answer to create monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedMonitor {
    pub id: String,
}

/// Query for the samples call.
///
/// Dates are ISO 8601 dates or datetimes (`2012-03-02`, `2012-03-01T12:00`).
/// At most 2000 samples come back per call; when `more` is set on the page, ask
/// again with `offset` advanced by the number of items received.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequestParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Query for the aggregate call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSampleParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// `day` or `hour`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// `location` or `step`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

impl AggregateSampleParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref f) = self.frequency {
            ensure_aggregate_frequency(f)?;
        }
        if let Some(ref g) = self.group_by {
            ensure_aggregate_group_by(g)?;
        }
        Ok(())
    }
}

/// One monitor run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sample {
    pub id: String,
    pub start_time: Option<String>,
    /// Milliseconds.
    pub duration: Option<f64>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub error_message: Option<String>,
    /// Fields this type does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Samples summarized over an hour or a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateSample {
    #[serde(deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub uptime: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub min: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub max: f64,
    pub date: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub avg: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub std_dev: f64,
    pub location: Option<String>,
    pub step_name: Option<String>,
    pub step_number: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub tp50: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub tp90: f64,
}

/// What the portal shows on the monitor list. Load times in milliseconds,
/// uptimes in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Summary {
    /// `Alerting`, `Warning`, `Scheduled`, `Active`, `Maintenance` or `Off`.
    pub status: Option<String>,
    pub general_status: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_uptime_day: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_uptime_week: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_uptime_month: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_uptime_quarter: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_uptime_year: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_loadtime_day: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_loadtime_week: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_loadtime_month: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_loadtime_quarter: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_loadtime_year: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub sample_count_day: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub sample_count_week: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub sample_count_month: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub sample_count_quarter: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub sample_count_year: u64,
    /// Previous UTC day.
    #[serde(deserialize_with = "null_as_default")]
    pub tp50: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub tp90: f64,
    pub last_sample_id: Option<String>,
    pub last_sample_at: Option<String>,
    pub last_sample_status: Option<String>,
    pub last_sample_duration: Option<f64>,
    pub last_sample_time_paused: Option<Value>,
    pub last_error_at: Option<String>,
    pub last_error_id: Option<String>,
    pub last_error_type: Option<Value>,
    pub last_error_message: Option<Value>,
}

/// Monitoring API handle, borrowed from a [`Client`].
pub struct Monitoring<'a> {
    client: &'a Client,
    options: CallOptions,
}

impl<'a> Monitoring<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            options: CallOptions::default(),
        }
    }

    /// Deadline for each call made through this handle.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// Create a monitor and return its id.
    pub async fn create(
        &self,
        params: &CreateMonitorParameters,
    ) -> Result<Outcome<CreatedMonitor>, Error> {
        params.validate()?;
        let req = ApiRequest::post(MONITOR_URI, params)?;
        self.client.fetch(req, self.options, decode_items).await
    }

    /// All monitors on the account.
    pub async fn list(&self) -> Result<Outcome<Vec<Monitor>>, Error> {
        let req = ApiRequest::get(MONITOR_URI);
        self.client.fetch(req, self.options, decode_list).await
    }

    /// One monitor. The service answers with the usual list envelope.
    pub async fn get(&self, id: &str) -> Result<Outcome<Vec<Monitor>>, Error> {
        let req = ApiRequest::get(monitor_path(id, ""));
        self.client.fetch(req, self.options, decode_list).await
    }

    /// Change some or all settings of a monitor.
    pub async fn update(
        &self,
        id: &str,
        params: &UpdateMonitorParameters,
    ) -> Result<Outcome<()>, Error> {
        params.validate()?;
        let req = ApiRequest::put(monitor_path(id, ""), params)?;
        self.client.fetch(req, self.options, |_| Ok(())).await
    }

    /// Delete a monitor and all of its data.
    ///
    /// A non-2xx answer means the monitor was not deleted; it comes back as
    /// [`Outcome::Rejected`] with the status, not as an error.
    pub async fn delete(&self, id: &str) -> Result<Outcome<()>, Error> {
        let req = ApiRequest::delete(monitor_path(id, ""));
        self.client.fetch(req, self.options, |_| Ok(())).await
    }

    /// HTTP Archive (HAR) data for one sample.
    pub async fn raw_sample_data(
        &self,
        monitor_id: &str,
        sample_id: &str,
    ) -> Result<Outcome<Value>, Error> {
        let suffix = format!("{}/{}", SAMPLES_URI, sample_id);
        let req = ApiRequest::get(monitor_path(monitor_id, &suffix));
        self.client.fetch(req, self.options, decode::<Value>).await
    }

    /// Samples for a time period, with overall timings only.
    pub async fn samples(
        &self,
        monitor_id: &str,
        params: &SampleRequestParameters,
    ) -> Result<Outcome<Page<Sample>>, Error> {
        let req = ApiRequest::get(monitor_path(monitor_id, SAMPLES_URI)).with_query(params)?;
        self.client.fetch(req, self.options, decode_page).await
    }

    /// Samples aggregated per hour or per day.
    pub async fn aggregate(
        &self,
        monitor_id: &str,
        params: &AggregateSampleParameters,
    ) -> Result<Outcome<Page<AggregateSample>>, Error> {
        params.validate()?;
        let req = ApiRequest::get(monitor_path(monitor_id, AGGREGATE_URI)).with_query(params)?;
        self.client.fetch(req, self.options, decode_page).await
    }

    /// Load time, uptime and sample counts for the day, week, month, quarter
    /// and year, plus the last sample and last error.
    pub async fn summary(&self, monitor_id: &str) -> Result<Outcome<Vec<Summary>>, Error> {
        let req = ApiRequest::get(monitor_path(monitor_id, SUMMARY_URI));
        self.client.fetch(req, self.options, decode_list).await
    }

    /// Monitoring locations available to the account.
    pub async fn locations(&self) -> Result<Outcome<Vec<String>>, Error> {
        let req = ApiRequest::get(format!("{}{}", MONITOR_URI, LOCATIONS_URI));
        self.client.fetch(req, self.options, decode_list).await
    }
}

fn monitor_path(id: &str, suffix: &str) -> String {
    format!("{}/{}{}", MONITOR_URI, id, suffix)
}

fn bool_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" | "y" | "yes" | "1" | "on" => Some(true),
            "false" | "n" | "no" | "0" | "off" => Some(false),
            _ => None,
        },
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        _ => None,
    })
}

/// An explicit `null` reads as the type's default, like a missing field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn list_or_csv<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Object(o) => o.get("name").and_then(|n| n.as_str()).map(String::from),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    })
}
