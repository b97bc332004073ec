//! Custom middleware implementations for the API.

pub mod request_id;

pub use request_id::*;
