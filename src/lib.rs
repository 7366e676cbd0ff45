use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod database;
pub mod edge;
pub mod handlers;
pub mod models;
pub mod shell;

// Routing segregation (Public, Admin, Assets).
pub mod routes;
use routes::{admin, assets, public};

// --- Public Re-exports ---

pub use auth::{AdminGate, GateDecision, GateState, OpenGate, SessionGate};
pub use config::AppConfig;
pub use database::{Database, MockPersistence, Persistence, PersistenceState};

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints, served at `/api-docs/openapi.json`.
/// HTML pages are left out.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::health_db),
    components(schemas(models::ConnectivityReport, database::ConnectionState)),
    tags(
        (name = "inscribo", description = "Inscribo enrollment and lead management")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single container of shared services, built once by `main` and cloned into
/// every request.
#[derive(Clone)]
pub struct AppState {
    /// Persistence Handle. Built once at startup; `main` closes it on shutdown.
    pub db: PersistenceState,
    /// Authorization predicate for the `/super-admin` namespace.
    pub gate: GateState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for PersistenceState {
    fn from_ref(app_state: &AppState) -> PersistenceState {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for GateState {
    fn from_ref(app_state: &AppState) -> GateState {
        app_state.gate.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles routes, the edge gate and the observability layers.
pub fn create_router(state: AppState) -> Router {
    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let app_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(admin::admin_routes())
        .merge(assets::asset_routes(&state.config.static_dir))
        .fallback(handlers::not_found)
        .with_state(state.clone());

    // The edge gate wraps every route and the fallback; its own route filter decides
    // which requests it acts on.
    app_router
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            edge::edge_gate,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
}

/// trace_span_logger
///
/// Builds the per-request span. Carries the `x-request-id` so every log line of one
/// request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
