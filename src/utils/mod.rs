//! Utility functions and helper modules.
//!
//! This module contains client IP extraction and the GDS signature primitives.

pub mod http;
pub mod signature;

pub use http::*;
pub use signature::*;
