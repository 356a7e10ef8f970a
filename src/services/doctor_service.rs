//! Doctor service - profile lookup for the access gate and the doctor
//! dashboard's notifications.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Doctor, Notification};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[async_trait]
pub trait DoctorService: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<Doctor>>;

    async fn notifications(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;

    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> AppResult<Notification>;
}

pub struct DoctorDirectory<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DoctorDirectory<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DoctorService for DoctorDirectory<U> {
    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<Doctor>> {
        self.uow.doctors().find_by_user_id(user_id).await
    }

    async fn notifications(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        self.uow.notifications().list_for_user(user_id).await
    }

    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> AppResult<Notification> {
        self.uow.notifications().mark_read(user_id, id).await
    }
}
