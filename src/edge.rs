use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::CONTENT_SECURITY_POLICY},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{GateDecision, GateState};

/// The Content-Security-Policy sent on every intercepted response.
///
/// Development-grade policy: inline scripts, inline styles and `eval` are allowed.
pub const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'self'; script-src 'self' 'unsafe-eval' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; font-src 'self' data:;";

/// Prefix of the privileged administration namespace.
pub const PRIVILEGED_PREFIX: &str = "/super-admin";

/// Path prefixes (after the leading `/`) the edge gate never intercepts:
/// static bundles, optimized images and the favicon.
pub const EXCLUDED_PREFIXES: [&str; 3] = ["_next/static", "_next/image", "favicon.ico"];

/// should_intercept
///
/// Route filter for the edge gate. Mirrors a `/((?!_next/static|_next/image|favicon.ico).*)`
/// matcher: the exclusions are prefix matches on the path after its leading slash.
pub fn should_intercept(path: &str) -> bool {
    let rest = path.strip_prefix('/').unwrap_or(path);
    !EXCLUDED_PREFIXES.iter().any(|prefix| rest.starts_with(prefix))
}

/// is_privileged
///
/// Plain prefix test, so `/super-administrator` is privileged too.
pub fn is_privileged(path: &str) -> bool {
    path.starts_with(PRIVILEGED_PREFIX)
}

/// Writes the security header set onto a response.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
    );
}

/// edge_gate
///
/// Runs ahead of routing for every request the route filter accepts:
///
/// 1. Requests under `/super-admin` are handed to the configured `AdminGate`, which may
///    let them continue, redirect them, or deny them.
/// 2. Whatever response comes back (handler output, redirect or denial) gets the
///    security header set.
///
/// Excluded asset paths are forwarded untouched.
pub async fn edge_gate(State(gate): State<GateState>, request: Request, next: Next) -> Response {
    if !should_intercept(request.uri().path()) {
        return next.run(request).await;
    }

    let request = if is_privileged(request.uri().path()) {
        let (parts, body) = request.into_parts();
        match gate.authorize(&parts).await {
            GateDecision::Allow => Request::from_parts(parts, body),
            GateDecision::Redirect(location) => {
                tracing::info!(path = %parts.uri.path(), %location, "Privileged request redirected");
                return secured(Redirect::temporary(&location).into_response());
            }
            GateDecision::Deny(status) => {
                tracing::warn!(path = %parts.uri.path(), %status, "Privileged request denied");
                return secured(status.into_response());
            }
        }
    } else {
        request
    };

    secured(next.run(request).await)
}

fn secured(mut response: Response) -> Response {
    apply_security_headers(response.headers_mut());
    response
}
