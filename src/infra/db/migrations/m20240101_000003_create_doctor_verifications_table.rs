//! Migration: Create doctor verification records.
//!
//! One row per doctor. `doctor_nic` and `user_id` are both unique.

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
                    .table(DoctorVerifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DoctorVerifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DoctorVerifications::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DoctorVerifications::DoctorNic)
                            .string_len(12)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DoctorVerifications::Specialization)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DoctorVerifications::Qualifications)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DoctorVerifications::LicenseDocumentUrl)
                            .string_len(2048)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DoctorVerifications::RegistrationDetails)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DoctorVerifications::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(DoctorVerifications::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DoctorVerifications::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(DoctorVerifications::ReviewedBy).uuid().null())
                    .col(
                        ColumnDef::new(DoctorVerifications::RejectionReason)
                            .text()
                            .null(),
                    )
                    .col(ColumnDef::new(DoctorVerifications::ReviewNotes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_doctor_verifications_user_id")
                            .from(DoctorVerifications::Table, DoctorVerifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Pending queue and filtered admin listings
        manager
            .create_index(
                Index::create()
                    .name("idx_doctor_verifications_status_submitted")
                    .table(DoctorVerifications::Table)
                    .col(DoctorVerifications::Status)
                    .col(DoctorVerifications::SubmittedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DoctorVerifications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DoctorVerifications {
    Table,
    Id,
    UserId,
    DoctorNic,
    Specialization,
    Qualifications,
    LicenseDocumentUrl,
    RegistrationDetails,
    Status,
    SubmittedAt,
    ReviewedAt,
    ReviewedBy,
    RejectionReason,
    ReviewNotes,
}
