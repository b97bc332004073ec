//! Ordered, regex-based route table with first-match dispatch.

use super::context::{InboundRequest, RequestContext};
use crate::models::MessageError;
use actix_web::{
    HttpResponse,
    http::{Method, StatusCode},
};
use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

/// Largest request body buffered for a handler unless configured otherwise
pub const DEFAULT_BODY_LIMIT: usize = 256 * 1024;

/// Errors raised while building the route table
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A request handler.
///
/// Captures are the pattern's capture groups, left to right, as strings. A
/// group that did not participate in the match is the empty string.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, ctx: &mut RequestContext, captures: &[String]);
}

/// Adapter turning a synchronous closure into a [`Handler`]
pub struct FnHandler<F>(F);

/// Wrap a closure that never touches the store as a [`Handler`]
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut RequestContext, &[String]) + Send + Sync,
{
    FnHandler(f)
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut RequestContext, &[String]) + Send + Sync,
{
    async fn call(&self, ctx: &mut RequestContext, captures: &[String]) {
        (self.0)(ctx, captures)
    }
}

struct Route {
    method: Method,
    pattern: Regex,
    handler: Box<dyn Handler>,
}

/// Maps `(method, path)` to the first registered matching handler.
///
/// Routes are matched in registration order, so when patterns overlap the
/// earlier registration wins. The table is built once at startup and only
/// read afterwards.
pub struct Router {
    routes: Vec<Route>,
    body_limit: usize,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// A JSON error envelope response, built without running any handler
pub fn error_response(request: InboundRequest, code: StatusCode, msg: &str) -> HttpResponse {
    let mut ctx = RequestContext::new(request);
    ctx.set_header("Content-Type", "application/json");
    ctx.abort(code, MessageError::new(code.as_u16(), msg).to_json());
    ctx.into_response()
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the request body size accepted for matched routes
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Register `handler` for `method` requests whose whole path matches
    /// `pattern`. The pattern must not carry its own `^`/`$` anchors.
    pub fn register<H>(&mut self, method: Method, pattern: &str, handler: H) -> Result<(), RouterError>
    where
        H: Handler + 'static,
    {
        let compiled =
            Regex::new(&format!("^(?:{pattern})$")).map_err(|source| RouterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        debug!(method = %method, pattern = %pattern, "Registered route");
        self.routes.push(Route {
            method,
            pattern: compiled,
            handler: Box::new(handler),
        });
        Ok(())
    }

    pub fn get<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.register(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.register(Method::POST, pattern, handler)
    }

    pub fn put<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.register(Method::PUT, pattern, handler)
    }

    pub fn delete<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.register(Method::DELETE, pattern, handler)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Whether any route would handle `method` on `path`
    pub fn has_route(&self, method: &Method, path: &str) -> bool {
        self.routes
            .iter()
            .any(|route| route.method == *method && route.pattern.is_match(path))
    }

    /// Locate the first route matching both `method` and the full `path`,
    /// returning its handler and the captured path segments.
    fn find(&self, method: &Method, path: &str) -> Option<(&dyn Handler, Vec<String>)> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route.pattern.captures(path).map(|caps| {
                    let captures = caps
                        .iter()
                        .skip(1)
                        .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                        .collect();
                    (route.handler.as_ref(), captures)
                })
            })
    }

    /// Run the first matching handler for `request`, or answer 404.
    pub async fn dispatch(&self, request: InboundRequest) -> HttpResponse {
        if request.query.is_empty() {
            info!(
                target: "request",
                request_id = ?request.request_id,
                method = %request.method,
                path = %request.path,
                "Incoming request"
            );
        } else {
            info!(
                target: "request",
                request_id = ?request.request_id,
                method = %request.method,
                path = %request.path,
                query = %request.query,
                "Incoming request"
            );
        }

        let method = request.method.clone();
        let path = request.path.clone();
        let mut ctx = RequestContext::new(request);
        ctx.set_header("Content-Type", "application/json");

        match self.find(&method, &path) {
            Some((handler, captures)) => handler.call(&mut ctx, &captures).await,
            None => {
                let not_found = MessageError::new(404, "Resource does not exist.");
                ctx.abort(StatusCode::NOT_FOUND, not_found.to_json());
            }
        }

        let response = ctx.into_response();
        debug!(
            target: "request",
            method = %method,
            path = %path,
            status = %response.status().as_u16(),
            "Request completed"
        );
        response
    }
}
