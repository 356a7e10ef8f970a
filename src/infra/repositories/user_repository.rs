//! User repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{AccountStatus, User, UserRole};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Emails are stored lowercased; pass a normalized address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_nic(&self, nic: &str) -> AppResult<Option<User>>;

    /// Page of users, newest first, optionally restricted to one role
    async fn list(
        &self,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;

    async fn update_status(&self, id: Uuid, status: AccountStatus) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        query::find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        query::find_by_email(&self.db, email).await
    }

    async fn find_by_nic(&self, nic: &str) -> AppResult<Option<User>> {
        query::find_by_nic(&self.db, nic).await
    }

    async fn list(
        &self,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        let mut select = UserEntity::find();
        if let Some(role) = role {
            select = select.filter(user::Column::Role.eq(role.as_str()));
        }

        let paginator = select
            .order_by_desc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page() - 1).await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn update_status(&self, id: Uuid, status: AccountStatus) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User")?;

        let mut active: ActiveModel = model.into();
        active.account_status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }
}

/// Queries shared by [`UserStore`] and the transaction-scoped repository.
pub(crate) mod query {
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
    use uuid::Uuid;

    use crate::domain::{AccountStatus, NewUser, User};
    use crate::errors::{AppError, AppResult};
    use crate::infra::repositories::entities::user::{self, ActiveModel, Entity as UserEntity};

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<User>> {
        Ok(UserEntity::find_by_id(id).one(db).await?.map(User::from))
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> AppResult<Option<User>> {
        Ok(UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(db)
            .await?
            .map(User::from))
    }

    pub async fn find_by_nic<C: ConnectionTrait>(db: &C, nic: &str) -> AppResult<Option<User>> {
        Ok(UserEntity::find()
            .filter(user::Column::Nic.eq(nic))
            .one(db)
            .await?
            .map(User::from))
    }

    /// Insert a new account. Accounts start active.
    pub async fn create<C: ConnectionTrait>(db: &C, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            nic: Set(new_user.nic),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            full_name: Set(new_user.full_name),
            phone: Set(new_user.phone),
            role: Set(new_user.role.as_str().to_string()),
            account_status: Set(AccountStatus::Active.as_str().to_string()),
            gender: Set(new_user.gender.as_str().to_string()),
            date_of_birth: Set(new_user.date_of_birth),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(db)
            .await
            .map_err(|e| AppError::on_unique_violation(e, "NIC or email is already registered"))?;
        Ok(User::from(model))
    }
}
