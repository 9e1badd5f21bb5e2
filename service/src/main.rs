#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use std::{net::SocketAddr, sync::Arc};

use rollcall_api::{
    cache::{spawn_sweeper, CacheStore, CachedUpstream},
    config::Config,
    http::{router, AppState, FeedDefaults},
    upstream::{HttpUpstreamClient, UpstreamFetcher},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load and validate configuration first (fail-fast)
    let config = Config::load().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up logging from config
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.level)?)
        .init();

    // Init banner so container logs clearly show startup
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "rollcall-api starting up"
    );

    let fetcher: Arc<dyn UpstreamFetcher> =
        Arc::new(HttpUpstreamClient::new(config.upstream_settings())?);
    tracing::info!(
        base_url = %config.upstream.congress_base_url,
        congress = config.upstream.congress,
        session = config.upstream.session,
        timeout_ms = config.upstream.timeout_ms,
        "upstream client configured"
    );

    let store = Arc::new(CacheStore::new());
    let _sweeper = spawn_sweeper(&store, config.sweep_interval());

    let state = AppState::new(
        CachedUpstream::new(store, fetcher),
        FeedDefaults::from_config(&config),
    );
    let app = router(
        state,
        &config.cors,
        &config.rate_limit,
        config.static_files.dir.as_deref(),
    );

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
