//! Configuration structures and loading utilities.
//!
//! This module contains all configuration structures used by the application,
//! including environment variable loading and default values.

pub mod auth;
pub mod server;
pub mod store;

pub use auth::*;
pub use server::*;
pub use store::*;

use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {var} has invalid value '{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}
