use anyhow::Context;
use secrecy::ExposeSecret;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_app::api::{self, AppState};
use todo_app::config::Config;
use todo_app::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_app=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = ?e, "Failed to start application");
        return Err(e);
    }

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    tracing::info!("Starting todo server...");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration (is DATABASE_URL set?)")?;
    tracing::info!(pool_max = config.db_pool_max, "Configuration loaded successfully");

    // Create database pool
    let pool = db::create_pool(config.database_url.expose_secret(), config.db_pool_max)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database pool created");

    // Run migrations before accepting traffic
    tracing::info!("Running database migrations...");
    if let Err(e) = db::run_migrations(&pool).await {
        db::close_pool(&pool).await;
        return Err(anyhow::Error::new(e).context("Migration failed"));
    }
    tracing::info!("Database migrations completed");

    let bind_addr = (config.host.clone(), config.port);

    // Build application state
    let state = AppState {
        pool: pool.clone(),
        config,
    };
    let app = api::router(state)?;

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .context("Failed to bind listener")?;
    let addr: SocketAddr = listener.local_addr()?;
    tracing::info!("Application is running on: http://{}", addr);

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db::close_pool(&pool).await;

    served.context("Server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cleaning up...");
}
