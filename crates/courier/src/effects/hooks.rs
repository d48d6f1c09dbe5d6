//! Hook and error handler traits for the request lifecycle.
//!
//! Hooks allow injecting caller-specific behaviour around a request without
//! touching the executor's sequencing. Error handlers observe failures; they
//! cannot change whether a call fails.

use async_trait::async_trait;

use crate::effects::response::Response;
use crate::error::{Error, HookError};

/// Lifecycle callbacks around a single `execute` call.
///
/// `before_request` runs before the transport is called and
/// `after_request` runs once the response head is available, before its
/// status is looked at. Returning an error fails the call.
#[async_trait]
pub trait RequestHook: Send + Sync {
    /// Name of this hook for error reporting.
    fn name(&self) -> &str { std::any::type_name::<Self>() }

    async fn before_request(&self) -> Result<(), HookError> { Ok(()) }

    async fn after_request(&self, _response: &Response) -> Result<(), HookError> { Ok(()) }
}

/// Side-channel for failures.
///
/// `handle_error` sees every thrown failure; `handle_http_error` sees every
/// completed response with a non-2xx status. Neither is called for the same
/// failure as the other.
pub trait ErrorHandler: Send + Sync {
    fn handle_error(&self, _error: &Error) {}

    fn handle_http_error(&self, _response: &Response) {}
}

/// The default hook set: does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl RequestHook for NoHooks {
    fn name(&self) -> &str { "none" }
}

/// The default error handler: ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreErrors;

impl ErrorHandler for IgnoreErrors {}

/// A hook that logs each request through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

#[async_trait]
impl RequestHook for TracingHook {
    fn name(&self) -> &str { "tracing" }

    async fn before_request(&self) -> Result<(), HookError> {
        tracing::debug!(target: "courier::http", "request starting");
        Ok(())
    }

    async fn after_request(&self, response: &Response) -> Result<(), HookError> {
        tracing::debug!(
            target: "courier::http",
            url = %response.url(),
            status = response.status().as_u16(),
            "response received"
        );
        Ok(())
    }
}

/// An error handler that logs through `tracing` (no bodies, no headers).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorHandler;

impl ErrorHandler for TracingErrorHandler {
    fn handle_error(&self, error: &Error) {
        tracing::error!(target: "courier::http", kind = ?error.kind(), err = %error, "request failed");
    }

    fn handle_http_error(&self, response: &Response) {
        tracing::warn!(
            target: "courier::http",
            url = %response.url(),
            status = response.status().as_u16(),
            "HTTP error response"
        );
    }
}
