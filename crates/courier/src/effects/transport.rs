use std::future::Future;

use crate::data::HttpRequest;
use crate::effects::response::Response;
use crate::error::TransportError;

/// Asynchronous HTTP transport abstraction.
///
/// This is the single network boundary of the crate. Implementations own
/// sockets, TLS, redirects and transport-level timeouts; the executor only
/// hands them a finished [`HttpRequest`] and consumes the [`Response`].
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - [`MockClient`](crate::effects::MockClient): scripted responses for tests
pub trait HttpClient: Send + Sync {
    /// Send `request` and return as soon as the status and headers are known.
    ///
    /// The body must be left unread; it is streamed later through
    /// [`Response::into_body`]. A non-2xx status is not an error here.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained (DNS failure,
    /// connection refused, timeout before headers).
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use futures_util::TryStreamExt;
    use http::StatusCode;

    use super::*;
    use crate::effects::response::Body;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> Self { Self::default() }

        /// Create a client whose requests time out after `timeout` unless a
        /// request sets its own.
        pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(map_reqwest_error)?;
            Ok(Self { client })
        }

        /// Wrap an existing [`reqwest::Client`].
        pub fn from_client(client: reqwest::Client) -> Self { Self { client } }
    }

    impl HttpClient for ReqwestClient {
        async fn send(&self, request: HttpRequest) -> Result<Response, TransportError> {
            let is_head = request.method == http::Method::HEAD;
            let mut builder = self
                .client
                .request(request.method, &request.url)
                .headers(request.headers);

            if let Some(body) = request.body {
                builder = builder.body(body);
            }
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }

            let response = builder.send().await.map_err(map_reqwest_error)?;

            let status = response.status();
            let headers = response.headers().clone();
            let url = response.url().to_string();
            let body = if is_head
                || status == StatusCode::NO_CONTENT
                || status == StatusCode::NOT_MODIFIED
            {
                Body::empty()
            } else {
                Body::from_stream(
                    response
                        .bytes_stream()
                        .map_err(|e| TransportError::Body(e.to_string())),
                )
            };

            Ok(Response::new(status, headers, url, body))
        }
    }

    fn map_reqwest_error(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else {
            TransportError::Other(Box::new(err))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
