use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};

use super::url::build_url;
use crate::data::{ExecutorConfig, Headers, HttpRequest, Method, MethodDescriptor, TransportOptions};
use crate::error::{Error, Result};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Returns `true` for statuses in `200..=299`.
pub fn is_success(status: StatusCode) -> bool { status.is_success() }

/// Declared body length, `None` if absent or not a number.
///
/// ```
/// use courier::core::content_length;
/// use http::{HeaderMap, HeaderValue, header::CONTENT_LENGTH};
///
/// let mut headers = HeaderMap::new();
/// assert_eq!(content_length(&headers), None);
/// headers.insert(CONTENT_LENGTH, HeaderValue::from_static("100"));
/// assert_eq!(content_length(&headers), Some(100));
/// ```
pub fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

/// Convert an ordered header list into a [`HeaderMap`].
pub fn header_map(headers: &Headers) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let invalid = || Error::InvalidHeader {
            name: name.to_string(),
        };
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Header set for `execute`: JSON content type, then configured headers,
/// then transport headers. Later sources win.
pub fn execute_headers(config: &ExecutorConfig) -> Headers {
    let mut headers = Headers::new();
    headers.insert(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE);
    headers.merge(&config.headers);
    headers.merge(&config.transport.headers);
    headers
}

/// The JSON payload to attach, if any.
///
/// Only POST, PUT and PATCH with a present body produce one.
pub fn encode_body(method: Method, descriptor: &MethodDescriptor) -> Result<Option<Bytes>> {
    match descriptor.data() {
        Some(data) if method.carries_body() => {
            let encoded = serde_json::to_vec(data).map_err(Error::Encode)?;
            Ok(Some(Bytes::from(encoded)))
        }
        _ => Ok(None),
    }
}

/// Assemble the request `execute` sends for `descriptor`.
///
/// The descriptor URI is joined with the base URL only when one is set.
pub fn build_execute_request(
    config: &ExecutorConfig,
    descriptor: &MethodDescriptor,
) -> Result<HttpRequest> {
    let url = if config.base_url.is_empty() {
        descriptor.uri().to_string()
    } else {
        build_url(&config.base_url, descriptor.uri())
    };
    // The override changes the wire verb only; the body follows the descriptor.
    let declared = descriptor.method();
    let method = config.transport.method.unwrap_or(declared);

    let mut request = HttpRequest::new(method.into(), url);
    request.headers = header_map(&execute_headers(config))?;
    request.body = match encode_body(declared, descriptor)? {
        Some(body) => Some(body),
        None if declared.carries_body() => config.transport.body.clone(),
        None => None,
    };
    request.timeout = config.transport.timeout;
    Ok(request)
}

/// Assemble a `download` request for `path`.
///
/// Caller options override the configured default headers; no JSON content
/// type is added.
pub fn build_download_request(
    config: &ExecutorConfig,
    path: &str,
    options: &TransportOptions,
) -> Result<HttpRequest> {
    let url = build_url(&config.base_url, path);
    let method = options.method.unwrap_or(Method::Get);

    let mut request = HttpRequest::new(method.into(), url);
    request.headers = header_map(&config.headers.clone().merged(&options.headers))?;
    request.body = options.body.clone();
    request.timeout = options.timeout.or(config.transport.timeout);
    Ok(request)
}
