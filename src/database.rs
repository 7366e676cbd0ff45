use async_trait::async_trait;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use sqlx::{
    ConnectOptions, PgPool, Postgres,
    pool::PoolConnection,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::config::{AppConfig, Env};

/// Statements slower than this are reported at WARN in development.
const SLOW_STATEMENT_THRESHOLD: Duration = Duration::from_secs(1);

/// ConnectionState
///
/// Observable lifecycle of the Persistence Handle, reported by `/health/db`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConnectionState {
    /// The pool has not been created yet.
    Idle,
    /// The pool holds at least one live connection.
    Connected,
    /// The pool exists but holds no live connection.
    Disconnected,
    /// `close()` has been called; no further connections will be opened.
    Closed,
}

/// Persistence Contract
///
/// The seam between the HTTP layer and the backing store. Handlers only need a
/// liveness check and the lifecycle; the query API stays on the concrete `Database`.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Performs one round-trip to the store.
    async fn ping(&self) -> Result<(), sqlx::Error>;

    /// Drains and closes every connection. Idempotent.
    async fn close(&self);

    fn is_closed(&self) -> bool;

    fn state(&self) -> ConnectionState;
}

/// PersistenceState
///
/// The handle shared through `AppState`. Built once by the bootstrap routine.
pub type PersistenceState = Arc<dyn Persistence>;

/// Database
///
/// The Persistence Handle backed by a Postgres pool. Construction only prepares connect
/// options; the pool itself is created on first access and reused for the lifetime of
/// the handle.
pub struct Database {
    connect_options: PgConnectOptions,
    max_connections: u32,
    acquire_timeout: Duration,
    pool: OnceLock<PgPool>,
    closed: AtomicBool,
}

impl Database {
    /// new
    ///
    /// Parses the connection string and applies the statement logging verbosity for the
    /// deployment mode: every statement at DEBUG plus slow statements at WARN in
    /// development, statement logging off in production so only errors surface.
    ///
    /// # Errors
    /// Returns the sqlx configuration error when `db_url` is not a valid Postgres URL.
    pub fn new(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let options: PgConnectOptions = config.db_url.parse()?;
        let connect_options = match config.env {
            Env::Development => options
                .log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, SLOW_STATEMENT_THRESHOLD),
            Env::Production => options.disable_statement_logging(),
        };

        Ok(Self {
            connect_options,
            max_connections: config.db_max_connections,
            acquire_timeout: config.db_acquire_timeout,
            pool: OnceLock::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// pool
    ///
    /// Returns the pool, creating it on the first call. Concurrent first callers race on
    /// the `OnceLock`, so exactly one pool is ever built. No I/O happens here; connections
    /// are opened on demand.
    pub fn pool(&self) -> &PgPool {
        self.pool.get_or_init(|| {
            tracing::debug!(
                max_connections = self.max_connections,
                "Creating Postgres connection pool"
            );
            PgPoolOptions::new()
                .max_connections(self.max_connections)
                .acquire_timeout(self.acquire_timeout)
                .connect_lazy_with(self.connect_options.clone())
        })
    }

    /// acquire
    ///
    /// Checks out a single connection. The connection goes back to the pool when the
    /// returned guard is dropped.
    ///
    /// # Errors
    /// Fails when the handle is closed or no connection can be opened within the
    /// acquire timeout.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, sqlx::Error> {
        if self.is_closed() {
            return Err(sqlx::Error::PoolClosed);
        }
        self.pool().acquire().await
    }
}

#[async_trait]
impl Persistence for Database {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
        tracing::info!("Database connection pool closed");
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn state(&self) -> ConnectionState {
        if self.is_closed() {
            return ConnectionState::Closed;
        }
        match self.pool.get() {
            None => ConnectionState::Idle,
            Some(pool) if pool.size() > 0 => ConnectionState::Connected,
            Some(_) => ConnectionState::Disconnected,
        }
    }
}

/// probe_connection
///
/// A single best-effort connectivity check. Never fails: the outcome is logged and
/// reduced to a boolean.
pub async fn probe_connection(store: &dyn Persistence) -> bool {
    match store.ping().await {
        Ok(()) => {
            tracing::info!("Database connection established");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Database connection failed");
            false
        }
    }
}

/// MockPersistence
///
/// In-memory stand-in used by tests so the HTTP layer can be exercised without Postgres.
pub struct MockPersistence {
    /// When true, every ping fails as if the store were unreachable.
    pub should_fail: bool,
    closed: AtomicBool,
}

impl MockPersistence {
    pub fn new() -> Self {
        Self { should_fail: false, closed: AtomicBool::new(false) }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true, closed: AtomicBool::new(false) }
    }
}

impl Default for MockPersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Persistence for MockPersistence {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        if self.is_closed() {
            return Err(sqlx::Error::PoolClosed);
        }
        if self.should_fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn state(&self) -> ConnectionState {
        match (self.is_closed(), self.should_fail) {
            (true, _) => ConnectionState::Closed,
            (false, true) => ConnectionState::Disconnected,
            (false, false) => ConnectionState::Connected,
        }
    }
}
