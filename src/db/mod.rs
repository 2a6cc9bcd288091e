use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// How long a request waits for a free connection before failing.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))
}

/// Drains the pool. Acquisitions after this point fail with `PoolClosed`.
pub async fn close_pool(pool: &PgPool) {
    tracing::info!(
        connections = pool.size(),
        idle = pool.num_idle(),
        "Closing database connections..."
    );
    pool.close().await;
    tracing::info!("Database connections closed");
}
