use anyhow::Context;
use secrecy::ExposeSecret;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::config::{redacted_database_target, DatabaseConfig};

/// Embedded schema migrations from `./migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let target = redacted_database_target(&config.url);
    tracing::info!(%target, max_connections = config.max_connections, "connecting to database");
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.url.expose_secret())
        .await
        .with_context(|| format!("connect to database at {target}"))
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(db).await.context("run migrations")?;
    tracing::info!("migrations up to date");
    Ok(())
}
