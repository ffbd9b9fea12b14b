use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lodge_quotes::cache::{start_cache_warmer, AppCache};
use lodge_quotes::config::Config;
use lodge_quotes::routes::create_router;
use lodge_quotes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!("Starting lodge-quotes v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;
    info!("Database pool ready");

    let cache = AppCache::new(config.template_cache_ttl);
    tokio::spawn(start_cache_warmer(
        cache.clone(),
        pool.clone(),
        config.template_cache_ttl,
    ));

    let addr = config.socket_addr()?;
    let app = create_router(AppState::new(pool, cache, config));

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
