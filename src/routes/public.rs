use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without a session. The edge gate still sets the security
/// headers on every response from here.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Landing page rendered through the root shell.
        .route("/", get(handlers::home))
        // GET /login?next=...
        // Sign-in page. The session gate redirects unauthenticated privileged requests here.
        .route("/login", get(handlers::login))
        // GET /health
        // Liveness probe. Returns "ok" without touching the database.
        .route("/health", get(handlers::health))
        // GET /health/db
        // Runs one connectivity probe against the Persistence Handle (200 or 503).
        .route("/health/db", get(handlers::health_db))
}
