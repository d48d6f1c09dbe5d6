use std::fmt;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt, stream};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::core;
use crate::error::{Error, Result, TransportError};

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Chunk stream carried by a [`Body`].
pub type ByteStream = BoxStream<'static, std::result::Result<Bytes, TransportError>>;

/// A response body: either absent or a stream of byte chunks.
pub struct Body {
    // The mutex is only there so `Body` is `Sync`; access always goes
    // through `&mut self` or `self`.
    stream: Option<Mutex<ByteStream>>,
}

impl Body {
    /// A body with nothing to read (HEAD, 204, ...).
    pub fn empty() -> Self { Self { stream: None } }

    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, TransportError>> + Send + 'static,
    {
        let stream: ByteStream = Box::pin(stream);
        Self {
            stream: Some(Mutex::new(stream)),
        }
    }

    /// A single-chunk body. Empty bytes give [`Body::empty`].
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Self::empty();
        }
        Self::from_stream(stream::iter([Ok(bytes)]))
    }

    /// `false` when there is no readable stream at all.
    pub fn is_readable(&self) -> bool { self.stream.is_some() }

    pub fn into_stream(self) -> ByteStream {
        match self.stream {
            Some(stream) => stream.into_inner().unwrap_or_else(PoisonError::into_inner),
            None => {
                let empty: ByteStream = Box::pin(stream::empty());
                empty
            }
        }
    }

    /// Read every chunk, in order, into one buffer.
    pub async fn collect(self) -> std::result::Result<Bytes, TransportError> {
        let mut stream = self.into_stream();
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl Default for Body {
    fn default() -> Self { Self::empty() }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("readable", &self.is_readable())
            .finish()
    }
}

/// An HTTP response whose body has not been read yet.
#[derive(Debug)]
pub struct Response {
    status:  StatusCode,
    headers: HeaderMap,
    url:     String,
    body:    Body,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, url: impl Into<String>, body: Body) -> Self {
        Self {
            status,
            headers,
            url: url.into(),
            body,
        }
    }

    pub fn status(&self) -> StatusCode { self.status }

    /// `true` for statuses in `200..=299`.
    pub fn ok(&self) -> bool { core::is_success(self.status) }

    pub fn headers(&self) -> &HeaderMap { &self.headers }

    pub fn url(&self) -> &str { &self.url }

    pub fn content_length(&self) -> Option<u64> { core::content_length(&self.headers) }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn has_body(&self) -> bool { self.body.is_readable() }

    pub fn into_body(self) -> Body { self.body }

    /// Same status, headers and URL with a different body.
    pub fn map_body(self, f: impl FnOnce(Body) -> Body) -> Self {
        Self {
            body: f(self.body),
            ..self
        }
    }

    pub async fn bytes(self) -> Result<Bytes> { Ok(self.body.collect().await?) }

    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Decode the body as JSON.
    ///
    /// An empty body is read as `null` instead of failing to parse, so a
    /// 204 reply decodes into `Option<T>` or `Value`. Target types that do
    /// not accept `null` still fail with [`Error::Decode`].
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        if bytes.is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(Error::Decode);
        }
        serde_json::from_slice(&bytes).map_err(Error::Decode)
    }

    pub async fn blob(self) -> Result<Blob> {
        let content_type = self.content_type().map(str::to_string);
        let bytes = self.bytes().await?;
        Ok(Blob {
            bytes,
            content_type,
        })
    }
}

/// A fully materialised binary body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes:        Bytes,
    content_type: Option<String>,
}

impl Blob {
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    pub fn size(&self) -> usize { self.bytes.len() }

    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    pub fn bytes(&self) -> &Bytes { &self.bytes }

    pub fn into_bytes(self) -> Bytes { self.bytes }

    pub fn content_type(&self) -> Option<&str> { self.content_type.as_deref() }

    pub fn text(&self) -> String { String::from_utf8_lossy(&self.bytes).into_owned() }

    /// Write the bytes to `path`, replacing any existing file.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        tokio::fs::write(path, &self.bytes).await?;
        Ok(())
    }
}
