use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Establishes a connection pool to the PostgreSQL database.
///
/// Connecting doubles as the startup connectivity check: if the server cannot
/// be reached within `connect_timeout_secs` the error is logged and returned,
/// and the caller is expected to abort.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let database_url = settings
        .require_url()
        .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.connect_timeout())
        .connect(database_url)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Database connection failed."))?;

    check_connection(&pool).await?;
    tracing::info!("Successfully connected to the database.");

    Ok(pool)
}

/// Forces a round trip to the server.
pub async fn check_connection(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Applies the embedded migrations so the schema is current before serving.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
