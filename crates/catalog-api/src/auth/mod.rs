//! Basic-auth authorizer
//!
//! Validates `Authorization: Basic <base64(username:password)>` tokens
//! against the configured credential table and produces an allow/deny
//! decision plus an effect-scoped policy document. An unknown user or wrong
//! password is a well-formed `Deny` decision; a missing or unparseable token
//! never reaches a decision and is an error. The guard always fails closed.

use crate::api::response::error_response;
use crate::config::AuthConfig;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;
use tracing::{debug, warn};

/// Policy document version emitted with every decision.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Action granted or withheld by the policy statement.
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// One statement of an issued policy document.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Resource")]
    pub resource: String,
}

/// Effect-scoped policy document accompanying a decision.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

/// Outcome of token validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthDecision {
    pub principal: String,
    pub effect: Effect,
}

impl AuthDecision {
    /// Render the decision as a policy document scoped to `resource`.
    pub fn policy(&self, resource: &str) -> PolicyDocument {
        PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                action: INVOKE_ACTION.to_string(),
                effect: self.effect,
                resource: resource.to_string(),
            }],
        }
    }
}

/// Why a token never reached a decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Unauthorized: No token provided")]
    MissingToken,
    #[error("Forbidden: Invalid credentials")]
    MalformedToken,
}

/// Validate a raw `Authorization` header value against the credential table.
///
/// Expected passwords are keyed by uppercased username; the lookup key is
/// uppercased here to match. A parseable token always yields a decision:
/// `Allow` when the password matches, `Deny` otherwise.
pub fn authorize(token: Option<&str>, config: &AuthConfig) -> Result<AuthDecision, AuthError> {
    let token = token.ok_or(AuthError::MissingToken)?;

    let (scheme, encoded) = token.split_once(' ').ok_or(AuthError::MalformedToken)?;
    if !scheme.eq_ignore_ascii_case("Basic") || encoded.trim().is_empty() {
        return Err(AuthError::MalformedToken);
    }

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| AuthError::MalformedToken)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedToken)?;

    let (username, password) = decoded.split_once(':').ok_or(AuthError::MalformedToken)?;

    let allowed = config
        .credentials
        .get(&username.to_uppercase())
        .is_some_and(|expected| expected == password);

    Ok(AuthDecision {
        principal: username.to_string(),
        effect: if allowed { Effect::Allow } else { Effect::Deny },
    })
}

/// Axum middleware guarding a route tree with basic auth.
pub async fn require_basic_auth(
    State(config): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match authorize(token, &config) {
        Ok(decision) if decision.effect == Effect::Allow => {
            debug!(principal = %decision.principal, "Request authorized");
            next.run(request).await
        },
        Ok(decision) => {
            warn!(principal = %decision.principal, "Rejected request with invalid credentials");
            error_response(StatusCode::FORBIDDEN, "Forbidden: Invalid credentials")
        },
        Err(err @ AuthError::MissingToken) => {
            warn!("Rejected request with no authorization token");
            error_response(StatusCode::UNAUTHORIZED, err.to_string())
        },
        Err(err) => {
            warn!("Rejected request with a malformed authorization token");
            error_response(StatusCode::FORBIDDEN, err.to_string())
        },
    }
}
