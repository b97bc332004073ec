//! GDS authentication configuration.

use std::env;

pub const DEFAULT_GDS_USER: &str = "username";
pub const DEFAULT_GDS_SECRET: &str = "password";
pub const DEFAULT_GDS_REALM: &str = "http://api.citeplasm.com/v1.0";

/// Configuration for GDS signature verification
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub username: String,
    pub secret: String,
    pub realm: String,
    /// Maximum distance, in seconds, between the `Date` header and now.
    /// `None` disables the freshness check.
    pub date_tolerance_seconds: Option<u64>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_GDS_USER.to_string(),
            secret: DEFAULT_GDS_SECRET.to_string(),
            realm: DEFAULT_GDS_REALM.to_string(),
            date_tolerance_seconds: None,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let username =
            env::var("CITEPLASM_GDS_USER").unwrap_or_else(|_| DEFAULT_GDS_USER.to_string());

        let secret =
            env::var("CITEPLASM_GDS_SECRET").unwrap_or_else(|_| DEFAULT_GDS_SECRET.to_string());

        let realm =
            env::var("CITEPLASM_GDS_REALM").unwrap_or_else(|_| DEFAULT_GDS_REALM.to_string());

        let date_tolerance_seconds = env::var("CITEPLASM_GDS_DATE_TOLERANCE")
            .ok()
            .and_then(|v| v.parse().ok());

        Self {
            username,
            secret,
            realm,
            date_tolerance_seconds,
        }
    }
}
