//! Deployment step: applies pending schema migrations and exits.

use anyhow::Context;
use gatehouse::{config, db, telemetry};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Logs which connection variables are present. Secrets are reported by
/// presence only.
fn report_connection_vars() {
    info!(present = env("DATABASE_URL").is_some(), "DATABASE_URL");
    for name in ["PGHOST", "PGPORT", "PGUSER", "PGDATABASE"] {
        match env(name) {
            Some(value) => info!(%value, "{name}"),
            None => info!("{name} missing"),
        }
    }
    info!(present = env("PGPASSWORD").is_some(), "PGPASSWORD");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    info!("running database migrations");
    report_connection_vars();

    let url = config::database_url(&env).map_err(|e| {
        error!(error = %e, "database is not configured for this service");
        e
    })?;
    let target = config::redacted_database_target(&url);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(url.expose_secret())
        .await
        .with_context(|| format!("connect to {target}"))?;

    if let Err(e) = db::migrate(&pool).await {
        error!(error = %e, "migration failed");
        return Err(e);
    }

    pool.close().await;
    info!(%target, "migrations completed");
    Ok(())
}
