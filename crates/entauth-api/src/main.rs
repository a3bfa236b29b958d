//! # entauth-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the enterprise verification API.
//! Binds to a configurable port (default 2342).

use entauth_api::state::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;

    let state = entauth_api::bootstrap::bootstrap(config).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    let app = entauth_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("entauth API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
