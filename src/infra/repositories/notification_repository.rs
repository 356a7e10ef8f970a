//! Notification repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::notification::{self, ActiveModel, Entity as NotificationEntity};
use crate::domain::Notification;
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;

    /// Mark one of the user's notifications as read. Other users'
    /// notifications are reported as missing.
    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> AppResult<Notification>;
}

pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let models = NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Notification::from).collect())
    }

    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> AppResult<Notification> {
        let model = NotificationEntity::find_by_id(id)
            .filter(notification::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or_not_found("Notification")?;

        if model.is_read {
            return Ok(Notification::from(model));
        }

        let mut active: ActiveModel = model.into();
        active.is_read = Set(true);
        let model = active.update(&self.db).await?;
        Ok(Notification::from(model))
    }
}

pub(crate) mod query {
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
    use uuid::Uuid;

    use crate::domain::{NewNotification, Notification};
    use crate::errors::AppResult;
    use crate::infra::repositories::entities::notification::ActiveModel;

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        notification: NewNotification,
    ) -> AppResult<Notification> {
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(notification.user_id),
            title: Set(notification.title),
            message: Set(notification.message),
            is_read: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        Ok(Notification::from(model))
    }
}
