//! Unit of Work over mocked repositories, for service unit tests.
//!
//! Transactions are not available; flows that need one are covered by the
//! SQLite-backed tests under `tests/`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    DoctorRepository, MockDoctorRepository, MockNotificationRepository, MockUserRepository,
    MockVerificationRepository, NotificationRepository, TransactionContext, UnitOfWork,
    UserRepository, VerificationRepository,
};

pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    doctors: Arc<MockDoctorRepository>,
    verifications: Arc<MockVerificationRepository>,
    notifications: Arc<MockNotificationRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            doctors: Arc::new(MockDoctorRepository::new()),
            verifications: Arc::new(MockVerificationRepository::new()),
            notifications: Arc::new(MockNotificationRepository::new()),
        }
    }
}

impl TestUnitOfWork {
    pub fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_doctors(mut self, repo: MockDoctorRepository) -> Self {
        self.doctors = Arc::new(repo);
        self
    }

    pub fn with_verifications(mut self, repo: MockVerificationRepository) -> Self {
        self.verifications = Arc::new(repo);
        self
    }

    pub fn with_notifications(mut self, repo: MockNotificationRepository) -> Self {
        self.notifications = Arc::new(repo);
        self
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorRepository> {
        self.doctors.clone()
    }

    fn verifications(&self) -> Arc<dyn VerificationRepository> {
        self.verifications.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notifications.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
