//! GDS request authentication.
//!
//! Clients send `Authorization: GDS <user>:<signature>` together with a `Date`
//! header. The signature is recomputed from the request and compared; see
//! [`crate::utils::signature`] for the canonical string.

use crate::{
    config::AuthConfig,
    models::{
        MessageError,
        audit::{AuthAuditEvent, AuthEventOutcome, AuthEventType},
    },
    routing::RequestContext,
    utils::signature,
};
use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Scheme token expected as the first field of the `Authorization` header
pub const GDS_SCHEME: &str = "GDS";

/// Reasons a request fails authentication. `Display` is the client message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("You must authenticate prior to accessing this resource.")]
    MissingHeader,
    #[error("The Authenticate header must be of the form 'GDS username:signature'.")]
    MalformedHeader,
    #[error("The Authenticate header did not contain a valid user.")]
    UnknownUser,
    #[error("The Authenticate header did not contain a valid signature.")]
    InvalidSignature,
    #[error("The Date header is outside the allowed window.")]
    StaleRequest,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

/// Outcome of [`SignatureVerifier::verify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated { user: String },
    Rejected { code: u16, message: String },
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated { .. })
    }
}

/// Looks up the shared secret for a GDS user
pub trait CredentialStore: Send + Sync {
    fn secret_for(&self, username: &str) -> Option<String>;
}

/// A single user/secret pair
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    username: String,
    secret: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl CredentialStore for StaticCredentials {
    fn secret_for(&self, username: &str) -> Option<String> {
        (username == self.username).then(|| self.secret.clone())
    }
}

/// Parse an RFC 1123 `Date` header. Some clients send `UTC` instead of `GMT`,
/// so that spelling is accepted too.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|e| match value.strip_suffix(" UTC") {
            Some(stripped) => DateTime::parse_from_rfc2822(&format!("{stripped} GMT")),
            None => Err(e),
        })
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Verifies GDS signatures on incoming requests
#[derive(Clone)]
pub struct SignatureVerifier {
    credentials: Arc<dyn CredentialStore>,
    realm: String,
    date_tolerance_seconds: Option<u64>,
}

impl SignatureVerifier {
    pub fn new(credentials: Arc<dyn CredentialStore>, realm: impl Into<String>) -> Self {
        Self {
            credentials,
            realm: realm.into(),
            date_tolerance_seconds: None,
        }
    }

    /// Build a verifier for the single configured user
    pub fn from_config(config: &AuthConfig) -> Self {
        let credentials = StaticCredentials::new(&config.username, &config.secret);
        let mut verifier = Self::new(Arc::new(credentials), &config.realm);
        verifier.date_tolerance_seconds = config.date_tolerance_seconds;
        verifier
    }

    /// Also reject requests whose `Date` header is more than `seconds` from now
    pub fn with_date_tolerance(mut self, seconds: u64) -> Self {
        self.date_tolerance_seconds = Some(seconds);
        self
    }

    /// Value of the `WWW-Authenticate` challenge header
    pub fn challenge(&self) -> String {
        format!("{GDS_SCHEME} realm=\"{}\"", self.realm)
    }

    /// Run the header checks in order, stopping at the first failure.
    /// Returns the authenticated user name.
    pub fn check(&self, ctx: &RequestContext) -> Result<String, AuthError> {
        let auth_header = ctx.request_header("Authorization");
        if auth_header.is_empty() {
            return Err(AuthError::MissingHeader);
        }

        let fields: Vec<&str> = auth_header.split_whitespace().collect();
        if fields.len() != 2 || fields[0] != GDS_SCHEME {
            return Err(AuthError::MalformedHeader);
        }

        let key_value: Vec<&str> = fields[1].split(':').collect();
        let [user, supplied] = key_value[..] else {
            return Err(AuthError::MalformedHeader);
        };

        let secret = self
            .credentials
            .secret_for(user)
            .ok_or(AuthError::UnknownUser)?;

        let date = ctx.request_header("Date");
        debug!(
            target: "auth",
            user = %user,
            body_md5 = %hex::encode(md5::compute(ctx.body()).0),
            date = %date,
            path = %ctx.path(),
            "Checking GDS signature"
        );

        if !signature::validate_signature(
            &secret,
            ctx.method().as_str(),
            ctx.body(),
            &date,
            ctx.path(),
            supplied,
        ) {
            return Err(AuthError::InvalidSignature);
        }

        if let Some(tolerance) = self.date_tolerance_seconds {
            let sent = parse_http_date(&date).ok_or(AuthError::StaleRequest)?;
            let skew = (Utc::now() - sent).num_seconds().unsigned_abs();
            if skew > tolerance {
                return Err(AuthError::StaleRequest);
            }
        }

        Ok(user.to_string())
    }

    /// Authenticate the request behind `ctx`.
    ///
    /// On rejection the challenge header is set and the response is aborted
    /// with a 401 JSON envelope; the caller must stop processing.
    pub fn verify(&self, ctx: &mut RequestContext) -> AuthOutcome {
        let result = self.check(ctx);

        let request = ctx.request();
        let event = match &result {
            Ok(user) => AuthAuditEvent::new(
                AuthEventType::SignatureAccepted,
                AuthEventOutcome::Success,
                request.client_ip.clone(),
                request.method.to_string(),
                request.path.clone(),
            )
            .with_user_id(Some(user.clone())),
            Err(err) => AuthAuditEvent::new(
                AuthEventType::SignatureRejected,
                AuthEventOutcome::Failure,
                request.client_ip.clone(),
                request.method.to_string(),
                request.path.clone(),
            )
            .with_reason(Some(err.to_string())),
        };
        event.with_request_id(request.request_id.clone()).log();

        match result {
            Ok(user) => AuthOutcome::Authenticated { user },
            Err(err) => {
                let code = err.status();
                let message = err.to_string();
                ctx.set_header("WWW-Authenticate", &self.challenge());
                ctx.abort(code, MessageError::new(code.as_u16(), &message).to_json());
                AuthOutcome::Rejected {
                    code: code.as_u16(),
                    message,
                }
            }
        }
    }
}
