//! HTTP request handlers for API endpoints.
//!
//! Handlers are plain [`crate::routing::Handler`] implementations registered on
//! the router by [`crate::app::build_router`].

pub mod providers;
pub mod root;

pub use providers::*;
pub use root::*;

use crate::{models::MessageError, routing::RequestContext};
use actix_web::http::StatusCode;

/// Abort the response with the standard `{code, msg}` error envelope
pub fn abort_with_error(ctx: &mut RequestContext, status: StatusCode, msg: &str) {
    ctx.abort(status, MessageError::new(status.as_u16(), msg).to_json());
}
