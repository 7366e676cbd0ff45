use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// The privileged `/super-admin` namespace.
///
/// Access Control:
/// No check happens in these handlers. The edge gate consults the configured `AdminGate`
/// for every path starting with `/super-admin` before routing, so with `ADMIN_GATE=open`
/// these pages are reachable by anyone.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/super-admin", get(handlers::super_admin))
        .route("/super-admin/{*rest}", get(handlers::super_admin_section))
}
