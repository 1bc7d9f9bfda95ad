use anyhow::Context;

use crate::config::AppConfig;
use crate::database::manager::DatabaseManager;
use crate::services::Store;
use crate::state::AppState;

pub async fn handle(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.api.port = port;
    }

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("SUPABASE_JWT_SECRET is not set; every protected request will be rejected");
    }

    // Missing or invalid database configuration is not fatal: the server still
    // answers public routes and reports 500 on protected ones.
    let pool = match DatabaseManager::connect_lazy(&config.database) {
        Ok(pool) => Some(pool),
        Err(e) => {
            tracing::warn!("Starting without a database client: {}", e);
            None
        }
    };

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(config, pool.clone().map(Store::postgres));
    let app = crate::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("StayDesk API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        DatabaseManager::close(&pool).await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
