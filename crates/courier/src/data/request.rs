use std::time::Duration;

use bytes::Bytes;
use http::HeaderMap;

/// A fully assembled request, ready for an [`HttpClient`](crate::effects::HttpClient).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method:  http::Method,
    /// The final URL, base URL already applied.
    pub url:     String,
    pub headers: HeaderMap,
    pub body:    Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: http::Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// The body as UTF-8 text, if there is one and it decodes.
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
