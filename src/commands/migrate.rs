//! Migrate command - Schema management for the booking tables.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

fn migration_failed(err: DbErr) -> AppError {
    AppError::internal(format!("Migration failed: {}", err))
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Manual control: connecting must not apply anything by itself
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(migration_failed)?;
            tracing::info!("Schema is up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration().await.map_err(migration_failed)?;
            tracing::info!("Rolled back the latest migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await.map_err(migration_failed)?;
            for line in status_lines(&status) {
                println!("{}", line);
            }
        }
        MigrateAction::Fresh { yes: false } => {
            return Err(AppError::bad_request(
                "Refusing to drop all tables without --yes",
            ));
        }
        MigrateAction::Fresh { yes: true } => {
            tracing::warn!("Dropping all tables and re-applying migrations");
            db.fresh_migrations().await.map_err(migration_failed)?;
            tracing::info!("Fresh schema created");
        }
    }

    Ok(())
}

/// One line per migration followed by a pending count.
fn status_lines(status: &[(String, bool)]) -> Vec<String> {
    let pending = status.iter().filter(|(_, applied)| !applied).count();

    status
        .iter()
        .map(|(name, applied)| {
            format!("{} {}", if *applied { "[x]" } else { "[ ]" }, name)
        })
        .chain(std::iter::once(format!(
            "{} of {} pending",
            pending,
            status.len()
        )))
        .collect()
}
