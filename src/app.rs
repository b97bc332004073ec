//! Route registration and the actix application factory.

use crate::{
    handlers::{API_ROOT, ListProviders, list_root_resources, redirect_to_current_version},
    middleware::RequestIdMiddleware,
    routing::{Router, RouterError, dispatch_request, handler_fn},
    services::{ObjectMapper, SignatureVerifier},
};
use actix_web::{App, web};

/// Register every route of the API, in priority order
pub fn build_router(
    mapper: ObjectMapper,
    verifier: SignatureVerifier,
) -> Result<Router, RouterError> {
    let version_root = regex::escape(API_ROOT);

    let mut router = Router::new();
    router.get("/", handler_fn(redirect_to_current_version))?;
    router.get(&version_root, handler_fn(list_root_resources))?;
    router.get(
        &format!("{version_root}/providers"),
        ListProviders::new(mapper, verifier),
    )?;

    Ok(router)
}

/// Creates the application around a fully built router
///
/// Every request falls through to the router; actix only contributes the
/// connection handling, body reading, and the request ID middleware. Used by
/// both the binary and the integration tests.
pub fn create_app(
    router: web::Data<Router>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestIdMiddleware)
        .app_data(router)
        .default_service(web::to(dispatch_request))
}
