//! Pure transformations for request execution.
//!
//! Everything here is deterministic and I/O free: URL composition, header
//! precedence, the body attachment policy and request assembly. The
//! effectful layer only calls into these.

mod request;
mod url;

pub use request::{
    JSON_CONTENT_TYPE, build_download_request, build_execute_request, content_length,
    encode_body, execute_headers, header_map, is_success,
};
pub use url::build_url;
