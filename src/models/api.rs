//! JSON envelopes returned by every endpoint.

use serde::{Deserialize, Serialize};

/// A reference to a resource: a human-readable label and the URI it lives at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub label: String,
    pub uri: String,
}

impl Resource {
    pub fn new(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            uri: uri.into(),
        }
    }
}

/// Envelope for a successful request for a result set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSuccess {
    pub msg: String,
    pub results: Vec<Resource>,
}

impl MessageSuccess {
    pub fn success(results: Vec<Resource>) -> Self {
        Self {
            msg: "success".to_string(),
            results,
        }
    }

    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// Envelope for a request that could not be fulfilled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageError {
    pub code: u16,
    pub msg: String,
}

impl MessageError {
    pub fn new(code: u16, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }

    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}
