//! Request routing: the route table and the per-request context.
//!
//! Every request reaching the actix app falls through to [`dispatch_request`],
//! which hands it to the shared [`Router`].

pub mod context;
pub mod router;

pub use context::{InboundRequest, RequestContext};
pub use router::{
    DEFAULT_BODY_LIMIT, FnHandler, Handler, Router, RouterError, error_response, handler_fn,
};

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use tracing::warn;

/// Actix default service: route the request through the application's [`Router`]
///
/// The body is only read once a route matched, and then at most
/// [`Router::body_limit`] bytes of it.
pub async fn dispatch_request(
    req: HttpRequest,
    payload: web::Payload,
    router: web::Data<Router>,
) -> HttpResponse {
    let request = InboundRequest::from_http(&req, web::Bytes::new());
    if !router.has_route(&request.method, &request.path) {
        return router.dispatch(request).await;
    }

    match payload.to_bytes_limited(router.body_limit()).await {
        Ok(Ok(body)) => router.dispatch(InboundRequest { body, ..request }).await,
        Ok(Err(e)) => {
            warn!(
                method = %request.method,
                path = %request.path,
                error = %e,
                "Failed to read request body"
            );
            error_response(request, StatusCode::BAD_REQUEST, "Invalid request body.")
        }
        Err(_) => {
            warn!(
                method = %request.method,
                path = %request.path,
                limit = router.body_limit(),
                "Request body exceeds limit"
            );
            error_response(
                request,
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body is too large.",
            )
        }
    }
}
