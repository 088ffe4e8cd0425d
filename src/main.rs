use std::net::SocketAddr;
use std::sync::Arc;

use netmeta_cache::{AppError, AppState, CacheMetrics, Config, Datasource, Result, create_router};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    setup_tracing();

    let config = Config::from_env();

    let Some(stream_config) = config.stream.clone() else {
        tracing::error!("No metadata stream configured, refusing to start");
        return Err(AppError::Config(
            "METADATA_STREAM_ADDRESS must be set".to_string(),
        ));
    };
    tracing::info!("Metadata stream at {}", stream_config.address);

    let metrics = CacheMetrics::new();

    // Graceful shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let (datasource, update_handle) =
        Datasource::connect_stream(&stream_config, metrics.clone(), shutdown_rx.clone())
            .await
            .map_err(|e| {
                tracing::error!("Failed to initialize metadata stream: {}", e);
                e
            })?;

    let state = Arc::new(AppState {
        metrics,
        datasource,
    });

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr.parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address: {}", e);
        e
    })?;

    tracing::info!("Metadata cache starting on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET /health                 - Health check");
    tracing::info!("  - GET /metrics                - Prometheus metrics");
    tracing::info!("  - GET /resources/ip/{{ip}}      - Resource by IP");
    tracing::info!("  - GET /resources/node/{{name}}  - Node by name");

    let mut server_shutdown = shutdown_rx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.wait_for(|stop| *stop).await;
            tracing::info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    // Make sure the update loop sees shutdown even if the server stopped on its own
    let _ = shutdown_tx.send(true);
    let _ = update_handle.await;

    Ok(())
}

fn setup_tracing() {
    // RUST_LOG wins; default to "info"
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
