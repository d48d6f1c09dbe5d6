//! Immutable data types for request execution.
//!
//! This module holds the request description, configuration and progress
//! types that are passed between the pure core and the effectful layer.
//! None of them perform I/O.

pub mod config;
pub mod descriptor;
pub mod headers;
pub mod method;
pub mod options;
pub mod progress;
pub mod request;

pub use config::{ExecutorConfig, StatusPolicy};
pub use descriptor::MethodDescriptor;
pub use headers::Headers;
pub use method::{Method, ParseMethodError};
pub use options::TransportOptions;
pub use progress::Progress;
pub use request::HttpRequest;
