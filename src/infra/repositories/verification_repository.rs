//! Doctor verification repository.
//!
//! Reads rebuild the typestate via `AnyVerification`; the only write after
//! submission is [`query::record_review`], a compare-and-set on `pending`.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::doctor_verification::{self, Entity as VerificationEntity};
use super::entities::user::{Entity as UserEntity, Model as UserModel};
use super::entities::VerificationModel;
use crate::domain::{
    AnyVerification, Applicant, StatusFilter, VerificationListItem, VerificationRecord,
    VerificationStatus,
};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VerificationRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<AnyVerification>>;

    async fn find_by_nic(&self, nic: &str) -> AppResult<Option<AnyVerification>>;

    /// Every pending verification, newest submission first
    async fn list_pending(&self) -> AppResult<Vec<VerificationListItem>>;

    /// Page of verifications matching `filter`, newest submission first
    async fn list(
        &self,
        filter: StatusFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<VerificationListItem>, u64)>;
}

pub struct VerificationStore {
    db: DatabaseConnection,
}

impl VerificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VerificationRepository for VerificationStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<AnyVerification>> {
        query::find_by_user_id(&self.db, user_id).await
    }

    async fn find_by_nic(&self, nic: &str) -> AppResult<Option<AnyVerification>> {
        let model = VerificationEntity::find()
            .filter(doctor_verification::Column::DoctorNic.eq(nic))
            .one(&self.db)
            .await?;
        model.map(AnyVerification::try_from).transpose()
    }

    async fn list_pending(&self) -> AppResult<Vec<VerificationListItem>> {
        let rows = VerificationEntity::find()
            .find_also_related(UserEntity)
            .filter(doctor_verification::Column::Status.eq(VerificationStatus::Pending.as_str()))
            .order_by_desc(doctor_verification::Column::SubmittedAt)
            .order_by_asc(doctor_verification::Column::Id)
            .all(&self.db)
            .await?;

        rows.into_iter().map(list_item).collect()
    }

    async fn list(
        &self,
        filter: StatusFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<VerificationListItem>, u64)> {
        let mut select = VerificationEntity::find().find_also_related(UserEntity);
        if let Some(status) = filter.status() {
            select = select.filter(doctor_verification::Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .order_by_desc(doctor_verification::Column::SubmittedAt)
            .order_by_asc(doctor_verification::Column::Id)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.page() - 1).await?;

        let items = rows
            .into_iter()
            .map(list_item)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((items, total))
    }
}

fn list_item(
    (verification, user): (VerificationModel, Option<UserModel>),
) -> AppResult<VerificationListItem> {
    let verification = VerificationRecord::from(AnyVerification::try_from(verification)?);
    let applicant = user.map(|u| Applicant {
        full_name: u.full_name,
        email: u.email,
        phone: u.phone,
    });
    Ok(VerificationListItem {
        verification,
        applicant,
    })
}

/// Queries shared by [`VerificationStore`] and the transaction-scoped repository.
pub(crate) mod query {
    use sea_orm::{
        sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
        Set,
    };
    use uuid::Uuid;

    use crate::domain::{AnyVerification, Application, ReviewOutcome, VerificationStatus};
    use crate::errors::{AppError, AppResult};
    use crate::infra::repositories::entities::doctor_verification::{
        self, ActiveModel, Entity as VerificationEntity,
    };

    pub async fn find_by_user_id<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> AppResult<Option<AnyVerification>> {
        let model = VerificationEntity::find()
            .filter(doctor_verification::Column::UserId.eq(user_id))
            .one(db)
            .await?;
        model.map(AnyVerification::try_from).transpose()
    }

    /// Store a new application as pending.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        application: Application,
    ) -> AppResult<AnyVerification> {
        let model = ActiveModel {
            id: Set(application.id),
            user_id: Set(application.user_id),
            doctor_nic: Set(application.doctor_nic),
            specialization: Set(application.specialization),
            qualifications: Set(application.qualifications),
            license_document_url: Set(application.license_document_url),
            registration_details: Set(application.registration_details),
            status: Set(VerificationStatus::Pending.as_str().to_string()),
            submitted_at: Set(application.submitted_at),
            reviewed_at: Set(None),
            reviewed_by: Set(None),
            rejection_reason: Set(None),
            review_notes: Set(None),
        }
        .insert(db)
        .await
        .map_err(|e| {
            AppError::on_unique_violation(e, "A verification already exists for this doctor")
        })?;

        AnyVerification::try_from(model)
    }

    /// Write a review outcome if, and only if, the row is still pending.
    ///
    /// Returns `Conflict` when another review got there first.
    pub async fn record_review<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        outcome: &ReviewOutcome,
    ) -> AppResult<()> {
        let result = VerificationEntity::update_many()
            .col_expr(
                doctor_verification::Column::Status,
                Expr::value(outcome.status().as_str()),
            )
            .col_expr(
                doctor_verification::Column::ReviewedAt,
                Expr::value(outcome.reviewed_at()),
            )
            .col_expr(
                doctor_verification::Column::ReviewedBy,
                Expr::value(outcome.reviewed_by()),
            )
            .col_expr(
                doctor_verification::Column::ReviewNotes,
                Expr::value(outcome.notes().map(str::to_string)),
            )
            .col_expr(
                doctor_verification::Column::RejectionReason,
                Expr::value(outcome.rejection_reason().map(str::to_string)),
            )
            .filter(doctor_verification::Column::Id.eq(id))
            .filter(doctor_verification::Column::Status.eq(VerificationStatus::Pending.as_str()))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::conflict(
                "Verification has already been reviewed",
            ));
        }
        Ok(())
    }
}
