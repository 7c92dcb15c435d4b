//! Atrium gateway binary

use atrium_common::auth::{session, HttpIdentityVerifier};
use atrium_common::config::AppConfig;
use atrium_common::db::TenantPools;
use atrium_common::tenancy::directory::{DirectorySeed, StaticOrgDirectory};
use atrium_common::tenancy::ConfigServiceDirectory;
use atrium_gateway::{create_router, graphql, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    if config.observability.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("Starting Atrium API Gateway v{}", atrium_common::VERSION);

    let config = Arc::new(config);

    let cookie_key = session::cookie_key(&config.auth)?;
    let verifier = Arc::new(HttpIdentityVerifier::new(&config.identity)?);

    let directory = match &config.tenancy.directory_file {
        Some(path) => StaticOrgDirectory::from_file(path)?,
        None => StaticOrgDirectory::new(DirectorySeed::default()),
    };

    let service_directory = ConfigServiceDirectory::new(config.tenancy.clone());
    let pools = TenantPools::new(Arc::new(service_directory), config.database.clone());

    let state = AppState {
        config: config.clone(),
        pools,
        verifier,
        directory: Arc::new(directory),
        cookie_key,
        schema: graphql::build_schema(),
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from((config.server.host.parse::<std::net::IpAddr>()?, config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
