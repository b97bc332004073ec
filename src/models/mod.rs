//! Data models for the Citeplasm API.
//!
//! This module contains the response envelopes, the persisted domain entities,
//! and the structured audit event types.

pub mod api;
pub mod audit;
pub mod provider;

pub use api::*;
pub use audit::*;
pub use provider::*;
