use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Deserializer};

use super::headers::Headers;
use super::method::Method;

/// Extra transport configuration layered on top of a request.
///
/// On an executor these are merged last into every `execute` call, so they
/// may override both the default content type and the configured headers.
/// Passed to `download` they override the executor's default headers.
///
/// # Examples
///
/// ```
/// use courier::data::TransportOptions;
/// use std::time::Duration;
///
/// let options = TransportOptions::default()
///     .timeout(Duration::from_secs(5))
///     .header("Authorization", "Bearer token");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Headers applied after every other header source.
    pub headers: Headers,

    /// Per-request timeout handed to the transport.
    ///
    /// Written as `timeout_ms` in configuration files.
    #[serde(rename = "timeout_ms", deserialize_with = "millis")]
    pub timeout: Option<Duration>,

    /// Verb override. Wins over the bound descriptor's verb.
    pub method: Option<Method>,

    /// Raw payload sent when no descriptor body is attached.
    #[serde(skip)]
    pub body: Option<Bytes>,
}

impl TransportOptions {
    /// Add a single header.
    ///
    /// ```
    /// use courier::data::TransportOptions;
    ///
    /// let options = TransportOptions::default()
    ///     .header("Accept", "application/octet-stream")
    ///     .header("User-Agent", "MyApp/1.0");
    /// assert_eq!(options.headers.len(), 2);
    /// ```
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace all headers at once.
    #[must_use]
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}
