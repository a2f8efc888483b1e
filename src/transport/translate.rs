//! Boundary translation between `http` types and the handler convention.
//!
//! # Responsibilities
//! - Extract the routing-relevant host from an outbound request
//! - Convert a buffered `http::Request` into an `AppRequest`
//! - Convert an `AppResponse` back into the client's response type

use bytes::Bytes;
use http::header::HOST;
use http::{Request, Response};
use http_body_util::Full;

use crate::app::{AppRequest, AppResponse};

/// Host of an outbound request: the URI authority when present, otherwise
/// the `Host` header with any port stripped.
pub(crate) fn request_host<B>(request: &Request<B>) -> Option<String> {
    if let Some(host) = request.uri().host() {
        return Some(host.to_owned());
    }
    request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(':').next().unwrap_or(value).to_owned())
}

pub(crate) fn into_app_request(parts: http::request::Parts, body: Bytes) -> AppRequest {
    AppRequest::new(parts.method, parts.uri, parts.headers, body)
}

pub(crate) fn into_http_response(response: AppResponse) -> Response<Full<Bytes>> {
    let (status, headers, body) = response.into_parts();
    let mut http_response = Response::new(Full::new(body));
    *http_response.status_mut() = status;
    *http_response.headers_mut() = headers;
    http_response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, CONTENT_TYPE};
    use http::StatusCode;

    #[test]
    fn test_host_from_absolute_uri() {
        let request = Request::builder()
            .uri("http://api.example.com:8080/v1")
            .body(())
            .unwrap();
        assert_eq!(request_host(&request).as_deref(), Some("api.example.com"));
    }

    #[test]
    fn test_host_falls_back_to_header() {
        let request = Request::builder()
            .uri("/relative")
            .header(HOST, "a.test:443")
            .body(())
            .unwrap();
        assert_eq!(request_host(&request).as_deref(), Some("a.test"));
    }

    #[test]
    fn test_host_absent() {
        let request = Request::builder().uri("/relative").body(()).unwrap();
        assert_eq!(request_host(&request), None);
    }

    #[test]
    fn test_app_response_roundtrip() {
        let response = AppResponse::new(StatusCode::IM_A_TEAPOT)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .with_body("short and stout");

        let http_response = into_http_response(response);
        assert_eq!(http_response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            http_response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain"
        );
    }
}
