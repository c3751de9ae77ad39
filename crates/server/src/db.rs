use axum::extract::FromRef;
use shared_types::{AppError, MediaConfig};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract `State<PgPool>` or
/// `State<MediaConfig>` directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub media: MediaConfig,
}

/// Read `DATABASE_URL`, loading `.env` first if present.
pub fn database_url() -> Result<String, AppError> {
    // Ignored in production where env vars are set directly.
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").map_err(|_| AppError::internal("DATABASE_URL must be set"))
}

/// Create a new database connection pool from environment variables.
/// Uses `connect_lazy` so no connections open until the first query.
pub fn create_pool() -> Result<Pool<Postgres>, AppError> {
    let database_url = database_url()?;

    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(&database_url)
        .map_err(|e| AppError::database(format!("Failed to create database pool: {e}")))
}

/// Apply the migrations under `migrations/` in version order.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to run database migrations: {e}")))?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Parse `database_url` into options for the `postgres` maintenance
/// database on the same server, plus the name of the target database.
///
/// `postgres://u:p@host:5432/legal_aid?sslmode=require` keeps its host,
/// credentials and TLS mode and swaps `legal_aid` for `postgres`.
pub fn maintenance_options(database_url: &str) -> Result<(PgConnectOptions, String), AppError> {
    let options = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::bad_request(format!("Invalid DATABASE_URL: {e}")))?;

    let name = options
        .get_database()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::bad_request("DATABASE_URL must contain a database name"))?
        .to_string();

    if !is_valid_database_name(&name) {
        return Err(AppError::bad_request(format!(
            "Invalid database name '{name}': use letters, digits and underscores"
        )));
    }

    Ok((options.database("postgres"), name))
}

fn is_valid_database_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

/// Create the database named in `database_url` unless it already exists.
/// Returns `true` when it was created.
#[tracing::instrument(skip(database_url))]
pub async fn create_database_if_missing(database_url: &str) -> Result<bool, AppError> {
    let (admin_options, db_name) = maintenance_options(database_url)?;

    let admin_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(admin_options)
        .await
        .map_err(|e| AppError::database(format!("Failed to connect to postgres database: {e}")))?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&admin_pool)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

    let created = if exists {
        tracing::info!(database = %db_name, "Database already exists");
        false
    } else {
        // Identifiers cannot be bound; the name was validated above.
        sqlx::query(&format!(
            "CREATE DATABASE \"{db_name}\" ENCODING 'UTF8' TEMPLATE template0"
        ))
        .execute(&admin_pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create database: {e}")))?;
        tracing::info!(database = %db_name, "Database created");
        true
    };

    admin_pool.close().await;
    Ok(created)
}
