use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::{debug, error};

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct Health {
    pub status: String,
    pub name: String,
    pub version: String,
    pub database: String,
    pub uptime_seconds: u64,
}

/// Liveness probe: 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database_ok = match state.users.ping().await {
        Ok(()) => {
            debug!("Database connection is healthy");
            true
        }
        Err(e) => {
            error!(error = %e, "Failed to ping database");
            false
        }
    };

    let health = Health {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_ok { "ok" } else { "error" }.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    };

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}
