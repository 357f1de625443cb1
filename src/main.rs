use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use customer_context_api::config::{Config, DataSourceKind};
use customer_context_api::context::ContextAggregator;
use customer_context_api::handlers::AppState;
use customer_context_api::router::build_router;
use customer_context_api::services::{
    CustomerDataSource, RemoteCustomerService, StubCustomerService,
};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The static asset directory.
/// - The customer data source.
/// - HTTP routes and middleware (CORS, timeout, tracing).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "customer_context_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let static_dir = config.prepare_static_dir()?;
    tracing::info!("Static directory ready: {}", static_dir.display());

    let source: Arc<dyn CustomerDataSource> = match config.data_source {
        DataSourceKind::Stub => {
            tracing::info!("Using stub customer data");
            Arc::new(StubCustomerService::new())
        }
        DataSourceKind::Remote => {
            let base_url = config
                .upstream_base_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("UPSTREAM_BASE_URL is required"))?;
            let service = RemoteCustomerService::new(
                base_url.clone(),
                Duration::from_millis(config.upstream_timeout_ms),
            )?;
            tracing::info!("✓ Remote customer data source: {}", base_url);
            Arc::new(service)
        }
    };

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
        aggregator: ContextAggregator::new(source),
    });

    let app = build_router(app_state);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
