//! Scripted transport for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use futures_util::stream;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderName};
use http::{HeaderMap, HeaderValue, StatusCode};

use crate::data::HttpRequest;
use crate::effects::response::{Body, Response};
use crate::effects::transport::HttpClient;
use crate::error::TransportError;

/// A response the [`MockClient`] will replay.
#[derive(Debug)]
pub struct MockResponse {
    status:  StatusCode,
    headers: HeaderMap,
    chunks:  Vec<Result<Bytes, TransportError>>,
}

impl MockResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            chunks: Vec::new(),
        }
    }

    pub fn ok() -> Self { Self::new(StatusCode::OK) }

    /// A JSON body in one chunk, with matching content type and length.
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        let body = Bytes::from(value.to_string());
        Self::new(status)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(CONTENT_LENGTH, HeaderValue::from(body.len()))
            .chunk(body)
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn content_length(self, length: u64) -> Self {
        self.header(CONTENT_LENGTH, HeaderValue::from(length))
    }

    #[must_use]
    pub fn chunk(mut self, chunk: impl Into<Bytes>) -> Self {
        self.chunks.push(Ok(chunk.into()));
        self
    }

    /// Make the body fail with `message` after the chunks added so far.
    #[must_use]
    pub fn fail_body(mut self, message: impl Into<String>) -> Self {
        self.chunks.push(Err(TransportError::Body(message.into())));
        self
    }

    fn into_response(self, url: String) -> Response {
        let body = if self.chunks.is_empty() {
            Body::empty()
        } else {
            Body::from_stream(stream::iter(self.chunks))
        };
        Response::new(self.status, self.headers, url, body)
    }
}

#[derive(Debug)]
enum Reply {
    Respond(MockResponse),
    Fail(TransportError),
}

#[derive(Debug, Default)]
struct MockState {
    replies:  VecDeque<Reply>,
    requests: Vec<HttpRequest>,
}

/// An [`HttpClient`] that replays queued replies in order and records
/// every request it receives.
///
/// Clones share the same queue and request log. Once the queue is empty
/// every call fails with [`TransportError::Connection`].
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn respond(self, response: MockResponse) -> Self {
        self.lock().replies.push_back(Reply::Respond(response));
        self
    }

    #[must_use]
    pub fn fail(self, error: TransportError) -> Self {
        self.lock().replies.push_back(Reply::Fail(error));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> { self.lock().requests.clone() }

    pub fn call_count(&self) -> usize { self.lock().requests.len() }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HttpClient for MockClient {
    async fn send(&self, request: HttpRequest) -> Result<Response, TransportError> {
        let url = request.url.clone();
        let reply = {
            let mut state = self.lock();
            state.requests.push(request);
            state.replies.pop_front()
        };
        match reply {
            Some(Reply::Respond(response)) => Ok(response.into_response(url)),
            Some(Reply::Fail(error)) => Err(error),
            None => Err(TransportError::Connection(format!("no scripted reply for {url}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replays_in_order_and_records() {
        let client = MockClient::new()
            .respond(MockResponse::json(StatusCode::CREATED, &json!({ "id": 1 })))
            .fail(TransportError::Timeout);

        let first = client
            .send(HttpRequest::new(http::Method::POST, "https://api.test/a"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        assert_eq!(first.content_length(), Some(8));
        assert_eq!(first.url(), "https://api.test/a");

        let second = client.send(HttpRequest::new(http::Method::GET, "https://api.test/b")).await;
        assert!(matches!(second, Err(TransportError::Timeout)));

        let third = client.send(HttpRequest::new(http::Method::GET, "https://api.test/c")).await;
        assert!(matches!(third, Err(TransportError::Connection(_))));

        let urls: Vec<_> = client.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["https://api.test/a", "https://api.test/b", "https://api.test/c"]);
    }

    #[tokio::test]
    async fn bodiless_response_has_no_stream() {
        let client = MockClient::new().respond(MockResponse::new(StatusCode::NO_CONTENT));
        let response = client
            .send(HttpRequest::new(http::Method::DELETE, "/x"))
            .await
            .unwrap();
        assert!(!response.has_body());
    }
}
