use inscribo::{
    AppState,
    auth::gate_from_config,
    config::{AppConfig, Env},
    create_router,
    database::{Database, Persistence, PersistenceState, probe_connection},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Bootstrap: configuration, logging, the Persistence Handle, the admin gate and the
/// HTTP server. Owns the Persistence Handle and closes it once the server has drained.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load().expect("FATAL: invalid configuration");

    // 2. Logging. RUST_LOG wins over the defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "inscribo=debug,tower_http=info,sqlx=warn".into());

    match config.env {
        Env::Development => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Persistence Handle. Created here, shared by reference from now on.
    let database = Arc::new(
        Database::new(&config).expect("FATAL: DATABASE_URL is not a valid Postgres URL"),
    );
    let db: PersistenceState = database.clone();

    // A failed probe is logged but does not stop startup; /health/db reports it.
    probe_connection(db.as_ref()).await;

    // 4. Admin gate
    let gate = gate_from_config(&config);
    tracing::info!(mode = ?config.admin_gate, "Admin gate configured");

    let bind_addr = config.bind_addr;
    let app_state = AppState { db, gate, config };
    let app = create_router(app_state);

    // 5. Server
    let listener = TcpListener::bind(bind_addr)
        .await
        .expect("FATAL: failed to bind listener");

    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("FATAL: server error");

    // 6. Teardown
    database.close().await;
    tracing::info!("HTTP server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
