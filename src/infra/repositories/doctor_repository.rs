//! Doctor profile repository.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::domain::{Doctor, DoctorProfileUpdate};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Doctor>>;

    /// Return the doctor's profile, creating an unverified "General" one
    /// when none exists yet.
    async fn ensure_profile(&self, user_id: Uuid, nic: &str) -> AppResult<Doctor>;
}

pub struct DoctorStore {
    db: DatabaseConnection,
}

impl DoctorStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DoctorRepository for DoctorStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Doctor>> {
        query::find_by_user_id(&self.db, user_id).await
    }

    async fn ensure_profile(&self, user_id: Uuid, nic: &str) -> AppResult<Doctor> {
        if let Some(doctor) = query::find_by_user_id(&self.db, user_id).await? {
            return Ok(doctor);
        }
        tracing::info!(user_id = %user_id, "Creating default doctor profile");
        query::upsert(&self.db, DoctorProfileUpdate::default_for(user_id, nic)).await
    }
}

/// Queries shared by [`DoctorStore`] and the transaction-scoped repository.
pub(crate) mod query {
    use chrono::Utc;
    use sea_orm::{
        sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
        Set,
    };
    use uuid::Uuid;

    use crate::domain::{Doctor, DoctorProfileUpdate};
    use crate::errors::AppResult;
    use crate::infra::repositories::entities::doctor::{self, ActiveModel, Entity as DoctorEntity};

    pub async fn find_by_user_id<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> AppResult<Option<Doctor>> {
        Ok(DoctorEntity::find()
            .filter(doctor::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .map(Doctor::from))
    }

    /// Create the profile or overwrite its credential fields. Counters and
    /// rating are left alone on update.
    pub async fn upsert<C: ConnectionTrait>(
        db: &C,
        update: DoctorProfileUpdate,
    ) -> AppResult<Doctor> {
        let now = Utc::now();
        let existing = DoctorEntity::find()
            .filter(doctor::Column::UserId.eq(update.user_id))
            .one(db)
            .await?;

        let model = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.nic = Set(update.nic);
                active.specialization = Set(update.specialization);
                active.qualifications = Set(update.qualifications);
                active.is_verified = Set(update.is_verified);
                active.updated_at = Set(now);
                active.update(db).await?
            }
            None => {
                ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(update.user_id),
                    nic: Set(update.nic),
                    specialization: Set(update.specialization),
                    qualifications: Set(update.qualifications),
                    is_verified: Set(update.is_verified),
                    rating: Set(0.0),
                    total_articles: Set(0),
                    total_views: Set(0),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(db)
                .await?
            }
        };

        Ok(Doctor::from(model))
    }

    /// Flip the verified flag on an existing profile. Missing profiles are
    /// left missing.
    pub async fn set_verified<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        is_verified: bool,
    ) -> AppResult<u64> {
        let result = DoctorEntity::update_many()
            .col_expr(doctor::Column::IsVerified, Expr::value(is_verified))
            .col_expr(doctor::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(doctor::Column::UserId.eq(user_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
