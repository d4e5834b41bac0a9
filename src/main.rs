use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use posts_api::app::{app, AppState};
use posts_api::auth::JwtIdentity;
use posts_api::database::{DatabaseManager, PgPostRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("posts_api=info,tower_http=info")),
        )
        .init();

    let config = posts_api::config::config();
    tracing::info!("Starting Posts API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; every authenticated request will be rejected");
    }
    if !config.security.enforce_update_ownership {
        tracing::warn!("Post updates are not ownership-checked (SECURITY_ENFORCE_UPDATE_OWNERSHIP=false)");
    }

    let pool = DatabaseManager::connect_lazy(&config.database)?;
    let state = AppState::new(
        Arc::new(PgPostRepository::new(pool.clone())),
        Arc::new(JwtIdentity::new(config.security.jwt_secret.clone())),
        config,
    );

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Posts API listening on http://{}", bind_addr);

    axum::serve(listener, app(state, config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Closed database pool");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
