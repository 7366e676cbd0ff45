use crate::{
    database::{PersistenceState, probe_connection},
    models::ConnectivityReport,
    shell::Page,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use maud::html;
use serde::Deserialize;

/// LoginQuery
///
/// Where the sign-in page should send the user afterwards.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

// --- Health ---

/// health
///
/// [Public Route] Liveness check for load balancers. Does not touch the database.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// health_db
///
/// [Public Route] Runs one connectivity probe against the Persistence Handle.
/// Returns 200 when the store answered, 503 otherwise. The probe never errors.
#[utoipa::path(
    get,
    path = "/health/db",
    responses(
        (status = 200, description = "Database reachable", body = ConnectivityReport),
        (status = 503, description = "Database unreachable", body = ConnectivityReport)
    )
)]
pub async fn health_db(State(db): State<PersistenceState>) -> impl IntoResponse {
    let connected = probe_connection(db.as_ref()).await;
    let report = ConnectivityReport {
        connected,
        state: db.state(),
        checked_at: chrono::Utc::now(),
    };
    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

// --- Pages ---

/// home
///
/// [Public Route] Landing page.
pub async fn home() -> Page {
    Page(html! {
        main {
            h1 { "Inscribo" }
            p { "Gestão de matrículas e leads para instituições de ensino." }
        }
    })
}

/// login
///
/// [Public Route] Sign-in page the session gate redirects to.
pub async fn login(Query(query): Query<LoginQuery>) -> Page {
    let next = query
        .next
        .filter(|target| is_local_path(target))
        .unwrap_or_else(|| "/".to_string());
    Page(html! {
        main {
            h1 { "Entrar" }
            p { "Faça login para continuar." }
            input type="hidden" name="next" value=(next);
        }
    })
}

/// super_admin
///
/// [Privileged Route] Root of the administration namespace.
pub async fn super_admin() -> Page {
    Page(html! {
        main { h1 { "Super Admin" } }
    })
}

/// super_admin_section
///
/// [Privileged Route] Any page nested under `/super-admin/`.
pub async fn super_admin_section(Path(rest): Path<String>) -> Page {
    Page(html! {
        main {
            h1 { "Super Admin" }
            h2 { (rest) }
        }
    })
}

/// not_found
///
/// Fallback for unmatched paths.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Page(html! {
            main {
                h1 { "404" }
                p { "Página não encontrada." }
            }
        }),
    )
}

/// is_local_path
///
/// Accepts only same-origin absolute paths. Browsers read `//host` and `/\host` as
/// protocol-relative URLs, so a second character of `/` or `\` is rejected, as are
/// control characters.
pub fn is_local_path(target: &str) -> bool {
    let mut chars = target.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/') | Some('\\'))
        && !target.chars().any(|c| c.is_control())
}
