use std::sync::Arc;
use std::time::Duration;

use gatehouse::{app, config::AppConfig, db, state::AppState, telemetry};
use tracing::{debug, error, info};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = match AppConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };
    info!(environment = ?config.environment, "configuration loaded");

    let pool = db::connect(&config.database).await.map_err(|e| {
        error!(error = %e, "failed to start");
        e
    })?;

    if config.database.run_migrations {
        if let Err(e) = db::migrate(&pool).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }
    }

    let state = AppState::init(config.clone(), pool.clone())?;

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            tick.tick().await;
            match sessions.purge_expired().await {
                Ok(0) => {}
                Ok(n) => debug!(purged = n, "expired sessions removed"),
                Err(e) => error!(error = %e, "session purge failed"),
            }
        }
    });

    let router = app::build_app(state);
    app::serve(router, &config.listen_addr(), app::shutdown_signal()).await?;

    pool.close().await;
    info!("database pool closed");
    Ok(())
}
