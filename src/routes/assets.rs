use std::path::Path;

use crate::AppState;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// Mount point for bundled static assets.
pub const STATIC_PREFIX: &str = "/_next/static";

/// Asset Router Module
///
/// Serves files straight from the static directory. These paths are on the edge gate's
/// exclusion list, so responses carry no security headers.
pub fn asset_routes(static_dir: &Path) -> Router<AppState> {
    Router::new()
        .nest_service(STATIC_PREFIX, ServeDir::new(static_dir))
        .route_service("/favicon.ico", ServeFile::new(static_dir.join("favicon.ico")))
}
