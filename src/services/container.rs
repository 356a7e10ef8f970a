//! Service Container - Centralized service access.
//!
//! Wires every service to one shared Unit of Work and exposes them as
//! trait objects to the API layer.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, DoctorDirectory, DoctorService, LicenseUploader, UploadService,
    UserManager, UserService, VerificationReviewer, VerificationService,
};
use crate::config::{Config, UPLOADS_URL_PATH};
use crate::infra::{LocalDiskStorage, Persistence};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn verifications(&self) -> Arc<dyn VerificationService>;

    fn doctors(&self) -> Arc<dyn DoctorService>;

    fn uploads(&self) -> Arc<dyn UploadService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    verification_service: Arc<dyn VerificationService>,
    doctor_service: Arc<dyn DoctorService>,
    upload_service: Arc<dyn UploadService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let storage = Arc::new(LocalDiskStorage::new(
            config.upload_dir.clone(),
            format!(
                "{}{}",
                config.public_base_url.trim_end_matches('/'),
                UPLOADS_URL_PATH
            ),
        ));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config.clone())),
            user_service: Arc::new(UserManager::new(uow.clone())),
            verification_service: Arc::new(VerificationReviewer::new(uow.clone())),
            doctor_service: Arc::new(DoctorDirectory::new(uow)),
            upload_service: Arc::new(LicenseUploader::new(storage)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn verifications(&self) -> Arc<dyn VerificationService> {
        self.verification_service.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorService> {
        self.doctor_service.clone()
    }

    fn uploads(&self) -> Arc<dyn UploadService> {
        self.upload_service.clone()
    }
}
