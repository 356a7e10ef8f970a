//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::infra::{Cache, Database, RateLimiter};
use crate::services::{
    AuthService, DoctorService, ServiceContainer, Services, UploadService, UserService,
    VerificationService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub verification_service: Arc<dyn VerificationService>,
    pub doctor_service: Arc<dyn DoctorService>,
    pub upload_service: Arc<dyn UploadService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub config: Arc<Config>,
    pub database: Arc<Database>,
    /// `None` when running without Redis (tests)
    pub cache: Option<Arc<Cache>>,
}

impl AppState {
    /// Production wiring: Postgres plus Redis, which also backs rate limiting.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: Config) -> Self {
        let rate_limiter: Arc<dyn RateLimiter> = cache.clone();
        Self::build(database, Some(cache), rate_limiter, config)
    }

    /// Wiring over an existing connection with a caller-supplied limiter.
    pub fn from_connection(
        connection: DatabaseConnection,
        rate_limiter: Arc<dyn RateLimiter>,
        config: Config,
    ) -> Self {
        let database = Arc::new(Database::from_connection(connection));
        Self::build(database, None, rate_limiter, config)
    }

    fn build(
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
        rate_limiter: Arc<dyn RateLimiter>,
        config: Config,
    ) -> Self {
        let services = Services::from_connection(database.get_connection(), &config);

        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            verification_service: services.verifications(),
            doctor_service: services.doctors(),
            upload_service: services.uploads(),
            rate_limiter,
            config: Arc::new(config),
            database,
            cache,
        }
    }
}
