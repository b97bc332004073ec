//! Provider listing endpoint.

use super::{API_ROOT, abort_with_error};
use crate::{
    models::{MessageSuccess, PROVIDER_NAMESPACE, Provider, Resource},
    routing::{Handler, RequestContext},
    services::{ObjectMapper, SignatureVerifier},
};
use actix_web::{http::StatusCode, web};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::error;

/// Providers returned when the client does not ask for a page size
pub const DEFAULT_PAGE_SIZE: usize = 11;

/// Largest page a client may request
pub const MAX_PAGE_SIZE: usize = 100;

/// Optional paging parameters for the provider listing
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// `GET /v1.0/providers`: authenticated listing of providers
#[derive(Clone)]
pub struct ListProviders {
    mapper: ObjectMapper,
    verifier: SignatureVerifier,
}

impl ListProviders {
    pub fn new(mapper: ObjectMapper, verifier: SignatureVerifier) -> Self {
        Self { mapper, verifier }
    }
}

#[async_trait]
impl Handler for ListProviders {
    async fn call(&self, ctx: &mut RequestContext, _captures: &[String]) {
        if !self.verifier.verify(ctx).is_authenticated() {
            return;
        }

        let Ok(web::Query(query)) = web::Query::<ListQuery>::from_query(ctx.query()) else {
            abort_with_error(ctx, StatusCode::BAD_REQUEST, "Invalid paging parameters.");
            return;
        };
        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);

        let entries = match self.mapper.load_indexed(PROVIDER_NAMESPACE, offset, limit).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, path = %ctx.path(), "Failed to load providers");
                abort_with_error(ctx, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.");
                return;
            }
        };

        let providers = entries
            .into_iter()
            .map(Provider::from_index)
            .map(|p| Resource::new(p.name.clone(), format!("{API_ROOT}{}", p.uri())))
            .collect();

        ctx.write(&MessageSuccess::success(providers).to_json());
    }
}
