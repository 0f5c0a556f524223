//! Clipforge HTTP server
//!
//! Main entry point for the HTTP API server.

use std::sync::Arc;

use infrastructure::{AppConfig, AppContext};
use presentation_http::{ApiKeyAuthLayer, RateLimitLayer, routes, state::AppState};
use secrecy::ExposeSecret;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipforge_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Clipforge v{} starting", env!("CARGO_PKG_VERSION"));

    // Load and validate configuration; a broken configuration is fatal here,
    // before any request is served
    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("{e}"))?;
    let context =
        AppContext::from_config(&config).map_err(|e| anyhow::anyhow!("startup failed: {e}"))?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        cache_enabled = config.cache.enabled,
        rate_limit_rpm = config.security.rate_limit_rpm,
        "configuration loaded"
    );

    let state = AppState {
        generation: Arc::clone(&context.generation),
        estimator: Arc::clone(&context.estimator),
        defaults: Arc::new(config.generation.clone()),
    };

    // Build router and middleware (order matters: first added = outermost)
    let auth_layer = ApiKeyAuthLayer::new(
        config
            .security
            .api_key
            .as_ref()
            .map(|key| key.expose_secret().to_string()),
    );
    let rate_limit_layer = RateLimitLayer::new(
        Arc::clone(&context.rate_limiter),
        config.security.rate_limit_enabled,
    );

    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(rate_limit_layer)
        .layer(auth_layer);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("received Ctrl+C, shutting down");
        }
        () = terminate => {
            info!("received SIGTERM, shutting down");
        }
    }
}
