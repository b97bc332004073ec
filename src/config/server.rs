//! HTTP listener configuration.

use crate::routing::DEFAULT_BODY_LIMIT;
use std::env;

/// Configuration for the HTTP server process
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Flush the store and load the fixture data set at startup
    pub seed_fixtures: bool,
    /// Largest request body, in bytes, read for a matched route
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:9999".to_string(),
            seed_fixtures: false,
            max_body_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let bind_addr = env::var("CITEPLASM_BIND").unwrap_or_else(|_| "0.0.0.0:9999".to_string());

        let seed_fixtures = env::var("CITEPLASM_SEED_FIXTURES")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let max_body_bytes = env::var("CITEPLASM_MAX_BODY_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_BODY_LIMIT);

        Self {
            bind_addr,
            seed_fixtures,
            max_body_bytes,
        }
    }
}
