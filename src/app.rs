//! Target application calling convention.
//!
//! # Responsibilities
//! - Define the normalized request handed to in-process handlers
//! - Define the normalized response handlers return
//! - Define the `AppHandler` trait the registry dispatches to
//!
//! # Design Decisions
//! - Handlers are synchronous and invoked on the caller's task; a handler
//!   that blocks makes the calling request block, mirroring a network call
//!   with timeouts disabled
//! - Bodies are fully buffered `Bytes` on both sides; handlers never see
//!   a streaming body
//! - Handler failures cross the boundary as boxed errors with the source
//!   preserved

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode, Uri};

use crate::error::BoxError;

/// An in-process application handler.
///
/// Receives the normalized request for every matched outbound call and
/// returns the response the original call site will see. Implemented for
/// any matching closure.
pub trait AppHandler: Send + Sync {
    fn call(&self, request: AppRequest) -> Result<AppResponse, BoxError>;
}

impl<F> AppHandler for F
where
    F: Fn(AppRequest) -> Result<AppResponse, BoxError> + Send + Sync,
{
    fn call(&self, request: AppRequest) -> Result<AppResponse, BoxError> {
        self(request)
    }
}

/// Normalized request passed to an [`AppHandler`]: method, full URI with
/// scheme/host/port/path/query accessors, headers, and the buffered body.
#[derive(Debug, Clone)]
pub struct AppRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl AppRequest {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            uri,
            headers,
            body: body.into(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// URL scheme, defaulting to "http" when the URI carries none.
    pub fn scheme(&self) -> &str {
        self.uri.scheme_str().unwrap_or("http")
    }

    pub fn host(&self) -> Option<&str> {
        self.uri.host()
    }

    /// Request port, falling back to the scheme default.
    pub fn port(&self) -> u16 {
        self.uri.port_u16().unwrap_or(match self.scheme() {
            "https" => 443,
            _ => 80,
        })
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Normalized response returned by an [`AppHandler`]: status, headers, body.
#[derive(Debug, Clone)]
pub struct AppResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl AppResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// A 200 response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK).with_body(body)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub(crate) fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.status, self.headers, self.body)
    }
}
