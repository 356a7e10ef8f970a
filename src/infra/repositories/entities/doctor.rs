//! Doctor profile entity.

use sea_orm::entity::prelude::*;

use crate::domain::Doctor;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub nic: String,
    pub specialization: String,
    pub qualifications: Option<String>,
    pub is_verified: bool,
    pub rating: f64,
    pub total_articles: i32,
    pub total_views: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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

impl From<Model> for Doctor {
    fn from(model: Model) -> Self {
        Doctor {
            id: model.id,
            user_id: model.user_id,
            nic: model.nic,
            specialization: model.specialization,
            qualifications: model.qualifications,
            is_verified: model.is_verified,
            rating: model.rating,
            total_articles: model.total_articles,
            total_views: model.total_views,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
