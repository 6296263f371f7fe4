//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cpl-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CRM_DATABASE_URL` - `PostgreSQL` connection string
//!   (fallback: `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/api/migrations/` and are embedded into this
//! binary at compile time, so a deployed `cpl-cli` migrates without the
//! source tree present:
//! ```text
//! migrations/
//! └── 20260815000001_create_crm_schema.sql
//! ```

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run CRM database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails or a migration cannot be applied.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("CRM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("CRM_DATABASE_URL"))?;

    tracing::info!("Connecting to CRM database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running CRM migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("CRM migrations complete!");
    Ok(())
}
