use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;

use super::headers::Headers;
use super::options::TransportOptions;
use crate::error::Result;

/// What the executor does with a completed non-2xx response.
///
/// The error handler's HTTP path is notified in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Hand the response back as `Outcome::Failed`.
    #[default]
    ReturnResponse,
    /// Fail the call with `Error::Status`.
    Raise,
}

/// Executor configuration, set once before any call.
///
/// # Examples
///
/// ```
/// use courier::data::{ExecutorConfig, StatusPolicy};
///
/// let config = ExecutorConfig::from_toml_str(r#"
///     base_url = "https://api.example.com"
///     status_policy = "raise"
///
///     [headers]
///     Accept = "application/json"
/// "#).unwrap();
///
/// assert_eq!(config.base_url, "https://api.example.com");
/// assert_eq!(config.status_policy, StatusPolicy::Raise);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Prefix joined with every descriptor URI and download path.
    /// Empty means URIs are used as given.
    pub base_url: String,

    /// Default headers, applied over the JSON content type.
    pub headers: Headers,

    /// Merged into every `execute` call after `headers`.
    pub transport: TransportOptions,

    pub status_policy: StatusPolicy,
}

impl ExecutorConfig {
    const ENV_PREFIX: &'static str = "COURIER_";

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(Figment::new().merge(Toml::string(source)).extract()?)
    }

    /// Load from a TOML file, overlaid with `COURIER_*` environment variables.
    ///
    /// A missing file yields the defaults plus whatever the environment sets.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"));
        Ok(figment.extract()?)
    }
}
