//! Neustar Web Performance Management API client library.
//!
//! Provides a typed, signed client for the monitoring, alerting, scripting and
//! instant test APIs. Every call answers `Result<Outcome<T>, Error>`: transport
//! and decode failures are errors, anything the service answered is an
//! [`Outcome`] carrying the status.
//!
//! ```rust,no_run
//! use neustar_lib::{Client, Credentials, Outcome};
//!
//! # async fn run() -> Result<(), neustar_lib::Error> {
//! let client = Client::new(Credentials::new("key", "secret"))?;
//! match client.monitoring().list().await? {
//!     Outcome::Success { value, .. } => println!("{} monitors", value.len()),
//!     Outcome::Rejected(e) => eprintln!("rejected: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod alerting;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod helpers;
pub mod instant_testing;
pub mod monitoring;
pub mod request;
pub mod scripting;
pub mod signature;
pub mod validation;

pub use client::{CallOptions, Client, ClientBuilder, RawResponse, API_BASE};
pub use config::{resolve_credentials, Config, CredentialSource};
pub use decode::{Outcome, Page};
pub use error::{describe_error_code, ApiError, Error, ValidationError};
pub use signature::{sign, Clock, Credentials, FixedClock, SystemClock};

/// Library version for User-Agent and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
