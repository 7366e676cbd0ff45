use async_trait::async_trait;
use axum::http::{StatusCode, header, request::Parts};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{AppConfig, GateMode};

/// Role a session must carry to enter the privileged namespace.
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

/// Claims
///
/// Payload of a session token. Tokens are HS256-signed with the configured session secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account the session belongs to.
    pub sub: Uuid,
    /// Role used for the privileged-namespace check.
    pub role: String,
    /// Expiration time (seconds since epoch). Always validated.
    pub exp: usize,
    pub iat: usize,
}

/// GateDecision
///
/// Outcome of an authorization check on a privileged request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Continue to the routed handler.
    Allow,
    /// Send the client elsewhere (typically the sign-in page).
    Redirect(String),
    /// Refuse with the given status.
    Deny(StatusCode),
}

/// AdminGate
///
/// The authorization predicate the edge middleware consults for every request in the
/// `/super-admin` namespace. Implementations only see the request head.
#[async_trait]
pub trait AdminGate: Send + Sync {
    async fn authorize(&self, parts: &Parts) -> GateDecision;
}

/// GateState
///
/// The gate shared with the edge middleware.
pub type GateState = Arc<dyn AdminGate>;

/// OpenGate
///
/// Lets every privileged request through. This is the default policy: the namespace is
/// earmarked for authentication but nothing is enforced until `ADMIN_GATE=session`.
#[derive(Debug, Clone, Default)]
pub struct OpenGate;

#[async_trait]
impl AdminGate for OpenGate {
    async fn authorize(&self, parts: &Parts) -> GateDecision {
        tracing::debug!(path = %parts.uri.path(), "Privileged path passed through open admin gate");
        GateDecision::Allow
    }
}

/// SessionGate
///
/// Requires a valid session token carrying the super-admin role. The token is read from
/// the session cookie first, then from an `Authorization: Bearer` header.
///
/// - no token, bad signature, malformed or expired token: redirect to the sign-in page,
///   carrying the original path in `next`
/// - valid token with another role: 403
pub struct SessionGate {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
    login_path: String,
}

impl SessionGate {
    pub fn new(secret: &str, cookie_name: impl Into<String>, login_path: impl Into<String>) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            cookie_name: cookie_name.into(),
            login_path: login_path.into(),
        }
    }

    fn token(&self, parts: &Parts) -> Option<String> {
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(&self.cookie_name) {
            return Some(cookie.value().to_string());
        }
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string)
    }

    fn login_redirect(&self, parts: &Parts) -> GateDecision {
        let target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path());
        GateDecision::Redirect(format!(
            "{}?next={}",
            self.login_path,
            urlencoding::encode(target)
        ))
    }
}

#[async_trait]
impl AdminGate for SessionGate {
    async fn authorize(&self, parts: &Parts) -> GateDecision {
        let Some(token) = self.token(parts) else {
            tracing::debug!(path = %parts.uri.path(), "No session token on privileged request");
            return self.login_redirect(parts);
        };

        let claims = match decode::<Claims>(&token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!(path = %parts.uri.path(), "Expired session token")
                    }
                    _ => tracing::warn!(path = %parts.uri.path(), error = %e, "Rejected session token"),
                }
                return self.login_redirect(parts);
            }
        };

        if claims.role != SUPER_ADMIN_ROLE {
            tracing::warn!(
                user_id = %claims.sub,
                role = %claims.role,
                "Session lacks super-admin role"
            );
            return GateDecision::Deny(StatusCode::FORBIDDEN);
        }

        GateDecision::Allow
    }
}

/// gate_from_config
///
/// Builds the admin gate selected by `ADMIN_GATE`.
pub fn gate_from_config(config: &AppConfig) -> GateState {
    match config.admin_gate {
        GateMode::Open => Arc::new(OpenGate),
        GateMode::Session => Arc::new(SessionGate::new(
            &config.session_secret,
            config.session_cookie.clone(),
            config.login_path.clone(),
        )),
    }
}
