//! Citeplasm API - HTTP gateway for a citation catalog
//!
//! The service is built from three pieces:
//! - an ordered, regex-based [`Router`] with first-match dispatch
//! - GDS request authentication ([`SignatureVerifier`]), an HMAC-SHA1
//!   signature over a canonical form of the request
//! - an object-to-hash persistence mapper ([`ObjectMapper`]) with per-type
//!   index lists over a Redis-style [`KeyValueStore`]
//!
//! ## Architecture
//!
//! - `routing/` - Router, route handlers trait, per-request context
//! - `services/` - Signature verification and object persistence
//! - `handlers/` - Endpoint implementations
//! - `models/` - Response envelopes, entities, audit events
//! - `store/` - Key-value store trait with Redis and in-memory backends
//! - `middleware/` - Request ID propagation
//! - `utils/` - Signature primitives and request helpers
//! - `config/` - Environment configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use actix_web::{web, HttpServer};
//! use citeplasm_api::{
//!     build_router, create_app, AuthConfig, InMemoryStore, ObjectMapper, SignatureVerifier,
//! };
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let mapper = ObjectMapper::new(Arc::new(InMemoryStore::new()));
//!     let verifier = SignatureVerifier::from_config(&AuthConfig::default());
//!     let router = web::Data::new(build_router(mapper, verifier).expect("valid routes"));
//!
//!     HttpServer::new(move || create_app(router.clone()))
//!         .bind("127.0.0.1:9999")?
//!         .run()
//!         .await
//! }
//! ```

pub mod app;
pub mod config;
pub mod fixtures;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod services;
pub mod store;
pub mod utils;

pub use app::{build_router, create_app};
pub use config::{AuthConfig, ConfigError, ServerConfig, StoreConfig};
pub use handlers::{ListProviders, list_root_resources, redirect_to_current_version};
pub use middleware::{RequestId, RequestIdMiddleware};
pub use models::{
    AuthAuditEvent, AuthEventOutcome, AuthEventType, MessageError, MessageSuccess, Provider,
    Resource,
};
pub use routing::{Handler, InboundRequest, RequestContext, Router, RouterError, handler_fn};
pub use services::{
    AuthError, AuthOutcome, CredentialStore, IndexEntry, MapperError, ObjectMapper, Persistable,
    SignatureVerifier, StaticCredentials,
};
pub use store::{InMemoryStore, KeyValueStore, RedisStore, StoreError};
pub use utils::signature::{canonical_string, create_signature, validate_signature};
