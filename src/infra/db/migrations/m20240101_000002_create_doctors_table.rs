//! Migration: Create doctor profiles.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Doctors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Doctors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Doctors::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Doctors::Nic).string_len(12).not_null())
                    .col(
                        ColumnDef::new(Doctors::Specialization)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Doctors::Qualifications).text().null())
                    .col(
                        ColumnDef::new(Doctors::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Doctors::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Doctors::TotalArticles)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Doctors::TotalViews)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Doctors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Doctors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_doctors_user_id")
                            .from(Doctors::Table, Doctors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Doctors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Doctors {
    Table,
    Id,
    UserId,
    Nic,
    Specialization,
    Qualifications,
    IsVerified,
    Rating,
    TotalArticles,
    TotalViews,
    CreatedAt,
    UpdatedAt,
}
