//! Error types for courier.

use std::io;

use http::StatusCode;
use thiserror::Error;

/// Boxed error used where a collaborator supplies its own error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while talking to the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("response body read failed: {0}")]
    Body(String),

    #[error("{0}")]
    Other(#[source] BoxError),
}

/// Error returned by a [`RequestHook`](crate::effects::RequestHook).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HookError {
    pub message: String,
    #[source]
    pub source: Option<BoxError>,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source:  None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source:  Some(source.into()),
        }
    }
}

/// Where in the request lifecycle a hook failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    BeforeRequest,
    AfterRequest,
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookStage::BeforeRequest => write!(f, "before_request"),
            HookStage::AfterRequest => write!(f, "after_request"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("no request method bound to the executor")]
    MissingMethod,

    #[error("invalid header `{name}`")]
    InvalidHeader { name: String },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("HTTP error {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("hook `{hook}` failed during {stage}: {source}")]
    Hook {
        hook:   String,
        stage:  HookStage,
        #[source]
        source: HookError,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The executor was used incorrectly; no request was sent.
    Usage,
    Transport,
    HttpStatus,
    Decoding,
    Hook,
    Config,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingMethod | Error::InvalidHeader { .. } | Error::Encode(_) => {
                ErrorKind::Usage
            }
            Error::Transport(_) => ErrorKind::Transport,
            Error::Status { .. } => ErrorKind::HttpStatus,
            Error::Decode(_) => ErrorKind::Decoding,
            Error::Hook { .. } => ErrorKind::Hook,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self { Error::Config(Box::new(e)) }
}
