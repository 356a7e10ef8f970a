//! User service - account lookup and admin account management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AccountStatus, NewUser, Nic, Password, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Newest accounts first, optionally restricted to one role
    async fn list_users(
        &self,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> AppResult<Paginated<User>>;

    /// Change an account's status. Admins cannot change their own.
    async fn update_account_status(
        &self,
        actor: Uuid,
        id: Uuid,
        status: AccountStatus,
    ) -> AppResult<User>;

    /// Provision an administrator account.
    async fn create_admin(
        &self,
        nic: Nic,
        email: String,
        full_name: String,
        password: String,
    ) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    async fn list_users(
        &self,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> AppResult<Paginated<User>> {
        let (users, total) = self.uow.users().list(role, params).await?;
        Ok(Paginated::new(users, &params, total))
    }

    async fn update_account_status(
        &self,
        actor: Uuid,
        id: Uuid,
        status: AccountStatus,
    ) -> AppResult<User> {
        if actor == id {
            return Err(AppError::Forbidden);
        }

        let user = self.uow.users().update_status(id, status).await?;
        tracing::info!(
            user_id = %id,
            actor = %actor,
            status = %status,
            "Account status changed"
        );
        Ok(user)
    }

    async fn create_admin(
        &self,
        nic: Nic,
        email: String,
        full_name: String,
        password: String,
    ) -> AppResult<User> {
        let new_user = NewUser {
            nic: nic.as_str().to_string(),
            email: email.trim().to_lowercase(),
            password_hash: Password::new(&password)?.into_string(),
            full_name: full_name.trim().to_string(),
            phone: None,
            role: UserRole::Admin,
            gender: nic.gender(),
            date_of_birth: nic.date_of_birth(),
        };

        let user = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.users().find_by_nic(&new_user.nic).await?.is_some() {
                        return Err(AppError::conflict("NIC is already registered"));
                    }
                    if ctx.users().find_by_email(&new_user.email).await?.is_some() {
                        return Err(AppError::conflict("Email is already registered"));
                    }
                    ctx.users().create(new_user).await
                })
            })
            .await?;

        tracing::info!(user_id = %user.id, "Admin account created");
        Ok(user)
    }
}
