//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-table workflows
//! (registration, verification review) inside one database transaction.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    doctor_query, notification_query, user_query, verification_query, DoctorRepository,
    DoctorStore, NotificationRepository, NotificationStore, UserRepository, UserStore,
    VerificationRepository, VerificationStore,
};
use crate::domain::{
    AnyVerification, Application, Doctor, DoctorProfileUpdate, NewNotification, NewUser,
    Notification, ReviewOutcome, User,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method.
/// Service tests implement it by hand over mocked repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn doctors(&self) -> Arc<dyn DoctorRepository>;

    fn verifications(&self) -> Arc<dyn VerificationRepository>;

    fn notifications(&self) -> Arc<dyn NotificationRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed on success, rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    pub fn doctors(&self) -> TxDoctorRepository<'_> {
        TxDoctorRepository { txn: self.txn }
    }

    pub fn verifications(&self) -> TxVerificationRepository<'_> {
        TxVerificationRepository { txn: self.txn }
    }

    pub fn notifications(&self) -> TxNotificationRepository<'_> {
        TxNotificationRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    doctor_repo: Arc<DoctorStore>,
    verification_repo: Arc<VerificationStore>,
    notification_repo: Arc<NotificationStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            doctor_repo: Arc::new(DoctorStore::new(db.clone())),
            verification_repo: Arc::new(VerificationStore::new(db.clone())),
            notification_repo: Arc::new(NotificationStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorRepository> {
        self.doctor_repo.clone()
    }

    fn verifications(&self) -> Arc<dyn VerificationRepository> {
        self.verification_repo.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notification_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-scoped user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxUserRepository<'_> {
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user_query::find_by_email(self.txn, email).await
    }

    pub async fn find_by_nic(&self, nic: &str) -> AppResult<Option<User>> {
        user_query::find_by_nic(self.txn, nic).await
    }

    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        user_query::create(self.txn, new_user).await
    }
}

/// Transaction-scoped doctor profile repository.
pub struct TxDoctorRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxDoctorRepository<'_> {
    pub async fn upsert(&self, update: DoctorProfileUpdate) -> AppResult<Doctor> {
        doctor_query::upsert(self.txn, update).await
    }

    /// Returns how many profiles changed (0 or 1).
    pub async fn set_verified(&self, user_id: Uuid, is_verified: bool) -> AppResult<u64> {
        doctor_query::set_verified(self.txn, user_id, is_verified).await
    }
}

/// Transaction-scoped verification repository.
pub struct TxVerificationRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxVerificationRepository<'_> {
    pub async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<AnyVerification>> {
        verification_query::find_by_user_id(self.txn, user_id).await
    }

    pub async fn create(&self, application: Application) -> AppResult<AnyVerification> {
        verification_query::create(self.txn, application).await
    }

    pub async fn record_review(&self, id: Uuid, outcome: &ReviewOutcome) -> AppResult<()> {
        verification_query::record_review(self.txn, id, outcome).await
    }
}

/// Transaction-scoped notification repository.
pub struct TxNotificationRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxNotificationRepository<'_> {
    pub async fn create(&self, notification: NewNotification) -> AppResult<Notification> {
        notification_query::create(self.txn, notification).await
    }
}
