use std::net::SocketAddr;

use anyhow::Context;
use mimalloc::MiMalloc;
use riskmatrix::config::AppConfig;
use riskmatrix::{db, routes, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "riskmatrix=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to the database")?;
    db::migrate(&pool).await.context("Failed to run migrations")?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("BACKEND_HOST/BACKEND_PORT do not form a socket address")?;
    tracing::info!(host = %addr, "Starting risk matrix API server");

    let app = routes::router(AppState { db: pool, config });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
