//! Credential loading: JSON config file or environment.
//!
//! The config file has the shape
//!
//! ```json
//! { "api": { "key": "...", "secret": "...", "baseUrl": "optional" } }
//! ```
//!
//! The environment fallback reads `NEUSTAR_KEY` and `NEUSTAR_SECRET`.

use crate::error::Error;
use crate::signature::Credentials;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const KEY_ENV: &str = "NEUSTAR_KEY";
pub const SECRET_ENV: &str = "NEUSTAR_SECRET";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub key: String,
    pub secret: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("Cannot parse {}: {}", path.display(), e)))?;
        if config.api.key.trim().is_empty() || config.api.secret.trim().is_empty() {
            return Err(Error::Config(format!(
                "{}: api.key and api.secret must be set",
                path.display()
            )));
        }
        Ok(config)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.api.key.clone(), self.api.secret.clone())
    }
}

/// Where the credentials came from (for diagnostics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    ConfigFile(PathBuf),
    Environment,
}

/// Credentials from `NEUSTAR_KEY` / `NEUSTAR_SECRET`.
pub fn credentials_from_env() -> Option<Credentials> {
    credentials_from_lookup(|name| std::env::var(name).ok())
}

fn credentials_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Credentials> {
    let read = |name: &str| {
        lookup(name)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    Some(Credentials::new(read(KEY_ENV)?, read(SECRET_ENV)?))
}

/// Resolve credentials from the config file when given, else the environment.
///
/// Returns the loaded config too, so callers can honor `api.baseUrl`.
pub fn resolve_credentials(
    config_path: Option<&Path>,
) -> Result<(Credentials, Option<Config>, CredentialSource), Error> {
    resolve_with(config_path, credentials_from_env)
}

fn resolve_with(
    config_path: Option<&Path>,
    from_env: impl FnOnce() -> Option<Credentials>,
) -> Result<(Credentials, Option<Config>, CredentialSource), Error> {
    if let Some(path) = config_path {
        let config = Config::load(path)?;
        let creds = config.credentials();
        return Ok((
            creds,
            Some(config),
            CredentialSource::ConfigFile(path.to_path_buf()),
        ));
    }
    if let Some(creds) = from_env() {
        return Ok((creds, None, CredentialSource::Environment));
    }
    Err(Error::Config(format!(
        "Credentials not found. Pass a config file ({{\"api\": {{\"key\", \"secret\"}}}}) \
         or set {} and {}.",
        KEY_ENV, SECRET_ENV
    )))
}
