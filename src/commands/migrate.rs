//! Migrate command - Schema management for the HerCycle tables.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Manual control: nothing runs on connect here
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
            let pending = status.iter().filter(|(_, applied)| !applied).count();

            for (name, applied) in &status {
                println!("{:<10} {}", if *applied { "applied" } else { "pending" }, name);
            }
            tracing::info!(total = status.len(), pending, "Migration status");
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables, every user and verification will be lost");
            db.fresh_migrations().await.map_err(migration_failed)?;
            tracing::info!("Schema recreated");
        }
    }

    Ok(())
}

fn migration_failed(e: DbErr) -> AppError {
    AppError::internal(format!("Migration failed: {}", e))
}
