//! Admin command - Provisions administrator accounts.
//!
//! Admins cannot self-register over HTTP, so this is the only way in.

use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::Config;
use crate::domain::Nic;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    match args.action {
        AdminAction::Create {
            nic,
            email,
            name,
            password,
        } => {
            let nic = Nic::parse(&nic)?;

            let db = Database::connect_without_migrations(&config)
                .await
                .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

            let services = Services::from_connection(db.get_connection(), &config);
            let admin = services
                .users()
                .create_admin(nic, email, name, password)
                .await?;

            println!("Created admin {} ({})", admin.email, admin.id);
        }
    }

    Ok(())
}
