//! Core services: request authentication and object persistence.

pub mod auth;
pub mod mapper;

pub use auth::*;
pub use mapper::*;
