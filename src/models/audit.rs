//! Audit logging data structures and types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Types of authentication events for audit logging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventType {
    SignatureAccepted,
    SignatureRejected,
}

/// Outcomes of authentication events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventOutcome {
    Success,
    Failure,
}

/// Structured audit log entry for a GDS authentication attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAuditEvent {
    pub event_type: AuthEventType,
    pub outcome: AuthEventOutcome,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    pub user_id: Option<String>,
    pub method: String,
    pub endpoint: String,
    pub request_id: Option<String>,
    pub reason: Option<String>,
}

impl AuthAuditEvent {
    /// Create a new audit event with basic information
    pub fn new(
        event_type: AuthEventType,
        outcome: AuthEventOutcome,
        ip_address: String,
        method: String,
        endpoint: String,
    ) -> Self {
        Self {
            event_type,
            outcome,
            timestamp: Utc::now(),
            ip_address,
            user_id: None,
            method,
            endpoint,
            request_id: None,
            reason: None,
        }
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Attach the rejection reason
    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    /// Log the audit event using structured logging
    pub fn log(&self) {
        info!(
            target: "auth_audit",
            event_type = ?self.event_type,
            outcome = ?self.outcome,
            timestamp = %self.timestamp,
            ip_address = %self.ip_address,
            user_id = ?self.user_id,
            method = %self.method,
            endpoint = %self.endpoint,
            request_id = ?self.request_id,
            reason = ?self.reason,
            "Authentication audit event"
        );
    }
}
