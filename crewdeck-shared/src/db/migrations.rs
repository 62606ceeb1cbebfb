/// Schema migration runner
///
/// Migrations are plain SQL files under `migrations/` at the workspace root,
/// embedded into the binary at compile time and applied in filename order.
/// The server runs them on every startup; already-applied files are skipped.

use sqlx::postgres::PgPool;
use tracing::{error, info};

/// Applies any migrations the database has not seen yet
///
/// # Errors
///
/// Returns an error when a migration fails to execute or a previously applied
/// file was modified after the fact (checksum mismatch).
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Applying database migrations");

    if let Err(e) = sqlx::migrate!("../migrations").run(pool).await {
        error!(error = %e, "Migration run failed");
        return Err(e);
    }

    info!("Database schema is up to date");
    Ok(())
}
