//! Verification service - admin review of doctor credentials.
//!
//! Approve and reject run in one transaction that re-reads the record,
//! moves it through the typestate, writes it with a compare-and-set on
//! `pending`, syncs the doctor profile and leaves the doctor a
//! notification. A second review of the same record is a conflict.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    AnyVerification, DoctorProfileUpdate, NewNotification, Nic, RejectionReason, Review,
    StatusFilter, VerificationListItem, VerificationRecord,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait VerificationService: Send + Sync {
    /// All pending verifications, newest first
    async fn list_pending(&self) -> AppResult<Vec<VerificationListItem>>;

    /// Paginated listing filtered by status
    async fn list(
        &self,
        filter: StatusFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<VerificationListItem>>;

    /// Approve the pending verification of the doctor with user id `doctor_id`.
    async fn approve(
        &self,
        doctor_id: Uuid,
        reviewer: Uuid,
        notes: Option<String>,
    ) -> AppResult<VerificationRecord>;

    /// Reject the pending verification of the doctor with user id `doctor_id`.
    async fn reject(
        &self,
        doctor_id: Uuid,
        reviewer: Uuid,
        reason: RejectionReason,
        notes: Option<String>,
    ) -> AppResult<VerificationRecord>;

    async fn get_by_nic(&self, nic: &str) -> AppResult<VerificationRecord>;
}

pub struct VerificationReviewer<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> VerificationReviewer<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> VerificationService for VerificationReviewer<U> {
    async fn list_pending(&self) -> AppResult<Vec<VerificationListItem>> {
        self.uow.verifications().list_pending().await
    }

    async fn list(
        &self,
        filter: StatusFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<VerificationListItem>> {
        let (items, total) = self.uow.verifications().list(filter, params).await?;
        Ok(Paginated::new(items, &params, total))
    }

    async fn approve(
        &self,
        doctor_id: Uuid,
        reviewer: Uuid,
        notes: Option<String>,
    ) -> AppResult<VerificationRecord> {
        let review = Review::now(reviewer, notes);

        let approved = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let pending = ctx
                        .verifications()
                        .find_by_user_id(doctor_id)
                        .await?
                        .ok_or_not_found("Verification")?
                        .into_pending()?;

                    let approved = pending.approve(review);
                    let application = approved.application();
                    ctx.verifications()
                        .record_review(application.id, &approved.outcome())
                        .await?;

                    ctx.doctors()
                        .upsert(DoctorProfileUpdate {
                            user_id: application.user_id,
                            nic: application.doctor_nic.clone(),
                            specialization: application.specialization.clone(),
                            qualifications: Some(application.qualifications.clone()),
                            is_verified: true,
                        })
                        .await?;

                    ctx.notifications()
                        .create(NewNotification::verification_approved(&approved))
                        .await?;

                    Ok(approved)
                })
            })
            .await?;

        tracing::info!(
            verification_id = %approved.application().id,
            doctor_id = %doctor_id,
            reviewer = %reviewer,
            status = "approved",
            "Doctor verification reviewed"
        );

        Ok(VerificationRecord::from(AnyVerification::from(approved)))
    }

    async fn reject(
        &self,
        doctor_id: Uuid,
        reviewer: Uuid,
        reason: RejectionReason,
        notes: Option<String>,
    ) -> AppResult<VerificationRecord> {
        let review = Review::now(reviewer, notes);

        let rejected = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let pending = ctx
                        .verifications()
                        .find_by_user_id(doctor_id)
                        .await?
                        .ok_or_not_found("Verification")?
                        .into_pending()?;

                    let rejected = pending.reject(review, reason);
                    ctx.verifications()
                        .record_review(rejected.application().id, &rejected.outcome())
                        .await?;

                    ctx.doctors()
                        .set_verified(rejected.application().user_id, false)
                        .await?;

                    ctx.notifications()
                        .create(NewNotification::verification_rejected(&rejected))
                        .await?;

                    Ok(rejected)
                })
            })
            .await?;

        tracing::info!(
            verification_id = %rejected.application().id,
            doctor_id = %doctor_id,
            reviewer = %reviewer,
            status = "rejected",
            "Doctor verification reviewed"
        );

        Ok(VerificationRecord::from(AnyVerification::from(rejected)))
    }

    async fn get_by_nic(&self, nic: &str) -> AppResult<VerificationRecord> {
        let nic = Nic::parse(nic)?;
        self.uow
            .verifications()
            .find_by_nic(nic.as_str())
            .await?
            .map(VerificationRecord::from)
            .ok_or_not_found("Verification")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::domain::{Applicant, Application, Verification, VerificationStatus};
    use crate::errors::AppError;
    use crate::infra::MockVerificationRepository;
    use crate::services::testing::TestUnitOfWork;

    fn pending(nic: &str) -> AnyVerification {
        Verification::submit(Application {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            doctor_nic: nic.to_string(),
            specialization: "Gynecology".to_string(),
            qualifications: "MBBS".to_string(),
            license_document_url: "https://x/doc.pdf".to_string(),
            registration_details: "SLMC 1234".to_string(),
            submitted_at: Utc::now(),
        })
        .into()
    }

    fn list_item(nic: &str) -> VerificationListItem {
        VerificationListItem {
            verification: VerificationRecord::from(pending(nic)),
            applicant: Some(Applicant {
                full_name: "Dr. Perera".to_string(),
                email: "perera@example.com".to_string(),
                phone: None,
            }),
        }
    }

    fn service(repo: MockVerificationRepository) -> VerificationReviewer<TestUnitOfWork> {
        VerificationReviewer::new(Arc::new(
            TestUnitOfWork::default().with_verifications(repo),
        ))
    }

    #[tokio::test]
    async fn test_list_pending() {
        let mut repo = MockVerificationRepository::new();
        repo.expect_list_pending()
            .returning(|| Ok(vec![list_item("200469201396"), list_item("901234567V")]));

        let items = service(repo).list_pending().await.unwrap();

        assert_eq!(items.len(), 2);
        assert!(items
            .iter()
            .all(|i| i.verification.status == VerificationStatus::Pending));
    }

    #[tokio::test]
    async fn test_list_builds_pagination_meta() {
        let params = PaginationParams::new(1, 20);
        let mut repo = MockVerificationRepository::new();
        repo.expect_list()
            .with(
                eq(StatusFilter::Only(VerificationStatus::Rejected)),
                eq(params),
            )
            .returning(|_, _| Ok((vec![list_item("200469201396")], 21)));

        let page = service(repo)
            .list(StatusFilter::Only(VerificationStatus::Rejected), params)
            .await
            .unwrap();

        assert_eq!(page.meta.total, 21);
        assert_eq!(page.meta.pages, 2);
        assert_eq!(page.data.len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_nic_normalizes_letter() {
        let mut repo = MockVerificationRepository::new();
        repo.expect_find_by_nic()
            .withf(|nic| nic == "901234567V")
            .returning(|nic| Ok(Some(pending(nic))));

        let record = service(repo).get_by_nic("901234567v").await.unwrap();
        assert_eq!(record.doctor_nic, "901234567V");
    }

    #[tokio::test]
    async fn test_get_by_nic_missing() {
        let mut repo = MockVerificationRepository::new();
        repo.expect_find_by_nic().returning(|_| Ok(None));

        let result = service(repo).get_by_nic("200469201396").await;
        assert!(matches!(result, Err(AppError::NotFound("Verification"))));
    }

    #[tokio::test]
    async fn test_get_by_nic_malformed() {
        let result = service(MockVerificationRepository::new())
            .get_by_nic("12345")
            .await;
        assert!(matches!(result, Err(AppError::InvalidFields(_))));
    }
}
