//! Per-request context handed to every route handler.

use crate::{middleware::RequestId, utils::http::extract_client_ip};
use actix_web::{
    HttpMessage, HttpRequest, HttpResponse,
    http::{
        Method, StatusCode,
        header::{self, HeaderMap, HeaderName, HeaderValue},
    },
    web::Bytes,
};
use std::borrow::Cow;
use tracing::warn;

/// The inbound half of a request, detached from the transport
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub client_ip: String,
    pub request_id: Option<String>,
}

impl InboundRequest {
    /// Capture everything a handler may need from an actix request and its body.
    ///
    /// The path is percent-decoded, except for `%2F`, `%25` and `%2B`, which
    /// stay encoded so that decoding never introduces new path segments.
    pub fn from_http(req: &HttpRequest, body: Bytes) -> Self {
        Self {
            method: req.method().clone(),
            path: req.match_info().unprocessed().to_string(),
            query: req.query_string().to_string(),
            headers: req.headers().clone(),
            body,
            client_ip: extract_client_ip(req),
            request_id: req.extensions().get::<RequestId>().map(|id| id.0.clone()),
        }
    }
}

/// Response-writing capability plus the parsed request.
///
/// Created fresh for each request by the router and consumed when the
/// response is flushed. Headers are buffered, so mutations made before
/// [`RequestContext::into_response`] all reach the client.
#[derive(Debug)]
pub struct RequestContext {
    request: InboundRequest,
    headers: HeaderMap,
    status: Option<StatusCode>,
    body: Vec<u8>,
    aborted: bool,
}

impl RequestContext {
    pub fn new(request: InboundRequest) -> Self {
        Self {
            request,
            headers: HeaderMap::new(),
            status: None,
            body: Vec::new(),
            aborted: false,
        }
    }

    pub fn request(&self) -> &InboundRequest {
        &self.request
    }

    pub fn method(&self) -> &Method {
        &self.request.method
    }

    pub fn path(&self) -> &str {
        &self.request.path
    }

    pub fn query(&self) -> &str {
        &self.request.query
    }

    /// Raw request body bytes
    pub fn body(&self) -> &[u8] {
        &self.request.body
    }

    /// Value of an inbound header, or the empty string when absent. Bytes
    /// that are not valid UTF-8 are replaced rather than dropping the header.
    pub fn request_header(&self, name: &str) -> Cow<'_, str> {
        match self.request.headers.get(name) {
            Some(value) => String::from_utf8_lossy(value.as_bytes()),
            None => Cow::Borrowed(""),
        }
    }

    /// Outgoing response headers
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn response_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set an outgoing header, replacing any previous value
    pub fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!(header = %name, "Dropping invalid response header"),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Append to the response body. Ignored once the response was aborted.
    pub fn write(&mut self, bytes: &[u8]) {
        if self.aborted {
            return;
        }
        self.body.extend_from_slice(bytes);
    }

    /// Instruct the client to go to `location`. No body is written.
    pub fn redirect(&mut self, code: StatusCode, location: &str) {
        self.status = Some(code);
        self.set_header(header::LOCATION.as_str(), location);
    }

    /// End the response with `code` and `body`.
    ///
    /// Later writes are dropped, but control flow is not unwound: the caller
    /// must return on its own.
    pub fn abort(&mut self, code: StatusCode, body: impl Into<Vec<u8>>) {
        self.status = Some(code);
        self.body = body.into();
        self.aborted = true;
    }

    /// Flush the buffered status, headers, and body into an HTTP response.
    /// The status defaults to 200 when none was set.
    pub fn into_response(self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status.unwrap_or(StatusCode::OK));
        for (name, value) in self.headers.iter() {
            builder.append_header((name.clone(), value.clone()));
        }
        builder.body(self.body)
    }
}
