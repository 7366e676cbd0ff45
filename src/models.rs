use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::database::ConnectionState;

/// ConnectivityReport
///
/// Response body of `GET /health/db`: the result of one connectivity probe.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ConnectivityReport {
    /// Whether the probe reached the database.
    pub connected: bool,
    // Handle lifecycle as observed right after the probe.
    pub state: ConnectionState,
    #[ts(type = "string")]
    pub checked_at: DateTime<Utc>,
}
