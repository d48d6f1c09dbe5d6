//! I/O operations behind trait seams.
//!
//! The transport is reached only through [`HttpClient`]; hooks, error
//! handlers and download monitors are trait objects the executor calls at
//! fixed points of a request's lifecycle.

mod executor;
mod hooks;
mod mock;
mod progress;
mod response;
mod transport;

pub use executor::{Outcome, RequestExecutor};
pub use hooks::{ErrorHandler, IgnoreErrors, NoHooks, RequestHook, TracingErrorHandler, TracingHook};
pub use mock::{MockClient, MockResponse};
pub use progress::{DownloadMonitor, ProgressStream, fetch_with_progress};
pub use response::{Blob, Body, BoxStream, ByteStream, Response};
pub use transport::HttpClient;

#[cfg(feature = "reqwest")]
pub use transport::ReqwestClient;
