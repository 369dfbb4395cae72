//! rosterd registration intake service.
//!
//! Main entry point for the rosterd server. Initializes all subsystems
//! and coordinates graceful startup and shutdown.

use std::time::Duration;

use anyhow::{Context, Result};
use rosterd_api::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with structured logging
    init_tracing();

    info!("Starting rosterd registration intake service");

    // Load configuration from defaults, config file, and environment
    let config = Config::load()?;
    let server_addr = config.parse_server_addr()?;
    info!(
        database_url = %config.database_url_masked(),
        server_addr = %server_addr,
        max_connections = config.database_max_connections,
        "Configuration loaded"
    );

    // Create database connection pool
    let db_pool = create_database_pool(&config).await?;
    info!("Database connection pool established");

    // Ensure the users table exists
    rosterd_core::storage::ensure_schema(&db_pool)
        .await
        .context("Failed to prepare database schema")?;
    info!("Database schema ready");

    // Start HTTP server
    let server_handle = tokio::spawn({
        let db_pool = db_pool.clone();
        async move {
            if let Err(e) = rosterd_api::start_server(db_pool, server_addr).await {
                error!(error = %e, "Server failed");
            }
        }
    });

    info!(addr = %server_addr, "rosterd is ready to receive registrations");

    // Wait for shutdown signal
    shutdown_signal().await;
    info!("Shutdown signal received, starting graceful shutdown");

    // Give in-flight requests time to complete
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(30)) => {
            info!("Shutdown grace period expired");
        }
        _ = server_handle => {
            info!("Server stopped");
        }
    }

    // Close database connections
    db_pool.close().await;
    info!("Database connections closed");

    info!("rosterd shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,rosterd=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Creates the database connection pool with retry logic.
async fn create_database_pool(config: &Config) -> Result<sqlx::PgPool> {
    let mut retries = 0;
    const MAX_RETRIES: u32 = 5;
    const RETRY_DELAY: Duration = Duration::from_secs(2);

    loop {
        match config.pool_options().connect(&config.database_url).await {
            Ok(pool) => {
                // Verify connection works
                sqlx::query("SELECT 1")
                    .fetch_one(&pool)
                    .await
                    .context("Failed to verify database connection")?;

                return Ok(pool);
            },
            Err(_e) if retries < MAX_RETRIES => {
                retries += 1;
                info!(
                    attempt = retries,
                    max_retries = MAX_RETRIES,
                    "Database connection failed, retrying..."
                );
                tokio::time::sleep(RETRY_DELAY).await;
            },
            Err(e) => {
                return Err(e).context("Failed to create database connection pool after retries");
            },
        }
    }
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received CTRL+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
