//! Doctor verification entity.
//!
//! Status is stored as text; the typestate is rebuilt on load through
//! [`AnyVerification::restore`].

use sea_orm::entity::prelude::*;

use crate::domain::{AnyVerification, Application, Review, VerificationStatus};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "doctor_verifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub doctor_nic: String,
    pub specialization: String,
    pub qualifications: String,
    pub license_document_url: String,
    pub registration_details: String,
    pub status: String,
    pub submitted_at: DateTimeUtc,
    pub reviewed_at: Option<DateTimeUtc>,
    pub reviewed_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub review_notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for AnyVerification {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let status = VerificationStatus::parse(&model.status).ok_or_else(|| {
            AppError::internal(format!(
                "verification {} has unknown status '{}'",
                model.id, model.status
            ))
        })?;

        let review = match (model.reviewed_by, model.reviewed_at) {
            (Some(reviewed_by), Some(reviewed_at)) => Some(Review {
                reviewed_by,
                reviewed_at,
                notes: model.review_notes,
            }),
            _ => None,
        };

        let application = Application {
            id: model.id,
            user_id: model.user_id,
            doctor_nic: model.doctor_nic,
            specialization: model.specialization,
            qualifications: model.qualifications,
            license_document_url: model.license_document_url,
            registration_details: model.registration_details,
            submitted_at: model.submitted_at,
        };

        AnyVerification::restore(application, status, review, model.rejection_reason)
    }
}
