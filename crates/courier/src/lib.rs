//! HTTP request execution with lifecycle hooks, error dispatch and
//! streaming download progress.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable request descriptions and configuration
//! - [`core`] - Pure transformations (URL joining, request assembly)
//! - [`effects`] - I/O behind trait abstractions
//!
//! # Key Features
//!
//! - **Pluggable transport**: anything implementing [`HttpClient`]; `reqwest` by default
//! - **Progress without buffering**: bodies are observed chunk by chunk as they stream
//! - **Explicit failure channels**: thrown errors go to [`ErrorHandler::handle_error`],
//!   non-2xx responses to [`ErrorHandler::handle_http_error`], and
//!   [`StatusPolicy`] decides whether the latter also fail the call

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use data::{
    ExecutorConfig, Headers, HttpRequest, Method, MethodDescriptor, Progress, StatusPolicy,
    TransportOptions,
};
pub use effects::{
    Blob, Body, DownloadMonitor, ErrorHandler, HttpClient, MockClient, MockResponse, Outcome,
    RequestExecutor, RequestHook, Response, TracingErrorHandler, TracingHook,
};
pub use error::{BoxError, Error, ErrorKind, HookError, HookStage, Result, TransportError};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
