//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{AccountStatus, Gender, User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub nic: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub account_status: String,
    pub gender: String,
    pub date_of_birth: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::doctor_verification::Entity")]
    DoctorVerification,
}

impl Related<super::doctor_verification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DoctorVerification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        // Unknown statuses must not be able to sign in
        let account_status =
            AccountStatus::parse(&model.account_status).unwrap_or(AccountStatus::Suspended);

        User {
            id: model.id,
            nic: model.nic,
            email: model.email,
            password_hash: model.password_hash,
            full_name: model.full_name,
            phone: model.phone,
            role: UserRole::from(model.role.as_str()),
            account_status,
            gender: Gender::from(model.gender.as_str()),
            date_of_birth: model.date_of_birth,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
