//! Entry points: the bare root and the versioned resource listing.

use crate::{
    models::{MessageSuccess, Resource},
    routing::RequestContext,
};
use actix_web::http::StatusCode;

/// Current API version prefix
pub const API_ROOT: &str = "/v1.0";

/// `GET /`: permanently redirect to the current API version
pub fn redirect_to_current_version(ctx: &mut RequestContext, _captures: &[String]) {
    ctx.redirect(StatusCode::MOVED_PERMANENTLY, API_ROOT);
}

/// `GET /v1.0`: list the top-level resources
pub fn list_root_resources(ctx: &mut RequestContext, _captures: &[String]) {
    let msg = MessageSuccess::success(vec![
        Resource::new("providers", format!("{API_ROOT}/providers")),
        Resource::new("resources", format!("{API_ROOT}/resources")),
    ]);
    ctx.write(&msg.to_json());
}
