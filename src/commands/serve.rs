//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Pending migrations run on connect
    let db = Arc::new(Database::connect(&config).await);
    tracing::info!("Database connected");

    let cache = Arc::new(Cache::connect(&config).await);
    tracing::info!("Redis cache connected");

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|e| {
            AppError::internal(format!(
                "Failed to create upload directory {}: {}",
                config.upload_dir.display(),
                e
            ))
        })?;

    tracing::info!(
        require_verified_doctor = config.require_verified_doctor,
        upload_dir = %config.upload_dir.display(),
        "Doctor gate configured"
    );

    let app_state = AppState::from_config(db, cache, config);
    let app = create_router(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    // Peer addresses feed the rate limiter when no proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
