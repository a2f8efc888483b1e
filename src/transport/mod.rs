//! Transport override and dispatch.
//!
//! # Data Flow
//! ```text
//! Outbound request
//!     → ShuntService (tower middleware; consults the registry per call)
//!     → matched: buffer body → AppRequest → handler → AppResponse
//!     → unmatched: delegate to the wrapped real client, buffer its body
//!     → Response<Full<Bytes>> either way
//! ```
//!
//! # Design Decisions
//! - The override is a tower layer around the client, not a hidden global
//!   hook: build the client once, control routing dynamically through the
//!   registry afterwards
//! - Matched dispatch performs no network I/O and inherits none of the
//!   transport's error taxonomy
//! - No retries and no timeouts here; unmatched requests get exactly the
//!   wrapped transport's behavior
//! - Responses are buffered so matched and passthrough paths share one
//!   body type

pub mod translate;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::{Layer, Service, ServiceExt};
use tracing::debug;

use crate::error::{BoxError, Error};
use crate::registry::{Registration, Registry};

/// Wraps an HTTP client service with interception dispatch.
#[derive(Clone)]
pub struct ShuntLayer {
    registry: Registry,
}

impl ShuntLayer {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl<S> Layer<S> for ShuntLayer {
    type Service = ShuntService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ShuntService {
            registry: self.registry.clone(),
            inner,
        }
    }
}

/// Client middleware that routes matched requests to in-process handlers
/// and delegates everything else to the wrapped real transport.
#[derive(Clone)]
pub struct ShuntService<S> {
    registry: Registry,
    inner: S,
}

impl<S> ShuntService<S> {
    pub fn new(registry: Registry, inner: S) -> Self {
        Self { registry, inner }
    }
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

impl<S, B> Service<Request<Full<Bytes>>> for ShuntService<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<B>> + Clone + Send + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
    B: hyper::body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Response = Response<Full<Bytes>>;
    type Error = Error;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner
            .poll_ready(cx)
            .map_err(|error| Error::Upstream(error.into()))
    }

    fn call(&mut self, request: Request<Full<Bytes>>) -> Self::Future {
        let registry = self.registry.clone();
        // Take the inner service that poll_ready readied; leave a fresh
        // clone behind for the next call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let host = translate::request_host(&request);
            let uri = request.uri().to_string();

            match registry.find(host.as_deref(), &uri) {
                Some(registration) => {
                    debug!(uri = %uri, "dispatching to in-process handler");
                    dispatch_local(&registration, request).await
                }
                None => {
                    debug!(uri = %uri, "no registration matched, delegating to real transport");
                    let response = inner
                        .call(request)
                        .await
                        .map_err(|error| Error::Upstream(error.into()))?;
                    buffer_response(response).await
                }
            }
        })
    }
}

/// Invoke the registration's handler with the translated request.
/// Handler failures propagate verbatim to the call site.
async fn dispatch_local(
    registration: &Registration,
    request: Request<Full<Bytes>>,
) -> Result<Response<Full<Bytes>>, Error> {
    let (parts, body) = request.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|error| Error::Body(Box::new(error)))?
        .to_bytes();

    let app_request = translate::into_app_request(parts, body);
    let app_response = registration.app().call(app_request).map_err(Error::Handler)?;
    Ok(translate::into_http_response(app_response))
}

async fn buffer_response<B>(response: Response<B>) -> Result<Response<Full<Bytes>>, Error>
where
    B: hyper::body::Body,
    B::Error: Into<BoxError>,
{
    let (parts, body) = response.into_parts();
    let bytes = body
        .collect()
        .await
        .map_err(|error| Error::Body(error.into()))?
        .to_bytes();
    Ok(Response::from_parts(parts, Full::new(bytes)))
}

/// Ready-made interception client: a [`ShuntService`] over a real
/// `hyper_util` legacy client, so unmatched requests hit the network.
#[derive(Clone)]
pub struct ShuntClient {
    service: ShuntService<Client<HttpConnector, Full<Bytes>>>,
}

impl ShuntClient {
    /// A client bound to the process-wide default registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::global().clone())
    }

    /// A client bound to an injected registry, for isolated use.
    pub fn with_registry(registry: Registry) -> Self {
        let upstream = Client::builder(TokioExecutor::new()).build_http();
        Self {
            service: ShuntService::new(registry, upstream),
        }
    }

    /// Send a request through the interception dispatch.
    pub async fn request(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<Response<Full<Bytes>>, Error> {
        self.service.clone().oneshot(request).await
    }

    /// Convenience GET with an empty body.
    pub async fn get(&self, uri: &str) -> Result<Response<Full<Bytes>>, Error> {
        let request = Request::builder()
            .uri(uri)
            .body(Full::default())
            .map_err(Error::Request)?;
        self.request(request).await
    }
}

impl Default for ShuntClient {
    fn default() -> Self {
        Self::new()
    }
}
