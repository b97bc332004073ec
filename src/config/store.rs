//! Key-value store connection configuration.

use super::ConfigError;
use std::env;
use url::Url;

/// Connection parameters for the Redis store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// `host:port` of the server
    pub addr: String,
    pub db: i64,
    pub password: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:6379".to_string(),
            db: 0,
            password: None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; a database index that is not an
    /// integer is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            env::var("CITEPLASM_REDIS_ADDR").ok(),
            env::var("CITEPLASM_REDIS_DB").ok(),
            env::var("CITEPLASM_REDIS_PWD").ok(),
        )
    }

    fn from_values(
        addr: Option<String>,
        db: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let addr = addr.filter(|v| !v.is_empty()).unwrap_or(defaults.addr);

        let db = match db.filter(|v| !v.is_empty()) {
            None => defaults.db,
            Some(value) => value.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var: "CITEPLASM_REDIS_DB",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?,
        };

        let password = password.filter(|v| !v.is_empty());

        Ok(Self { addr, db, password })
    }

    /// Connection URL in the `redis://[:password@]host:port/db` form
    pub fn url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            var: "CITEPLASM_REDIS_ADDR",
            value: self.addr.clone(),
            reason,
        };

        let mut url = Url::parse(&format!("redis://{}", self.addr)).map_err(|e| invalid(e.to_string()))?;
        url.set_path(&format!("/{}", self.db));
        if let Some(password) = &self.password {
            url.set_password(Some(password))
                .map_err(|_| invalid("address cannot carry credentials".to_string()))?;
        }
        Ok(url)
    }
}
