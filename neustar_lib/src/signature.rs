//! API credentials and the per-request digital signature.
//!
//! Every call carries `apikey` and `sig` query parameters. The signature is the
//! lowercase hex MD5 of the key, the shared secret and the current Unix time in
//! seconds, so it must be produced right before the request goes out.

use md5::{Digest, Md5};
use std::fmt;

/// API key and shared secret. Immutable once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    fn unix_seconds(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn unix_seconds(&self) -> i64 {
        self.0
    }
}

/// Signature for a request issued now, according to `clock`.
pub fn sign(credentials: &Credentials, clock: &dyn Clock) -> String {
    sign_at(credentials, clock.unix_seconds())
}

/// Signature for a request issued at `epoch_seconds`.
pub fn sign_at(credentials: &Credentials, epoch_seconds: i64) -> String {
    let mut hasher = Md5::new();
    hasher.update(credentials.key.as_bytes());
    hasher.update(credentials.secret.as_bytes());
    hasher.update(epoch_seconds.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
