//! Error types for registration and dispatch.

use thiserror::Error;

/// Boxed error type used at the handler and transport boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by registration and dispatch.
///
/// Handler and upstream failures keep their source intact so the call site
/// sees the original error, exactly as it would from a real transport.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or conflicting matcher options passed to `register`.
    #[error("invalid matcher: {0}")]
    InvalidMatcher(String),

    /// The target application handler failed during a matched dispatch.
    /// Propagated verbatim; no retry or recovery is attempted.
    #[error("target handler failed")]
    Handler(#[source] BoxError),

    /// The real transport failed while handling an unmatched request.
    #[error("upstream transport failed")]
    Upstream(#[source] BoxError),

    /// Reading a request or response body failed.
    #[error("body read failed")]
    Body(#[source] BoxError),

    /// The request could not be constructed.
    #[error("invalid request")]
    Request(#[source] http::Error),
}
