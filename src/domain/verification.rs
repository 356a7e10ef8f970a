//! Doctor credential verification lifecycle.
//!
//! A verification is a typestate machine: only `Verification<Pending>`
//! exposes `approve` and `reject`, so a reviewed record cannot be
//! reviewed again without first going through [`AnyVerification::into_pending`],
//! which refuses terminal records.
//!
//! ```text
//! pending ──approve──▶ approved
//!    │
//!    └─────reject────▶ rejected
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    VERIFICATION_APPROVED, VERIFICATION_FILTER_ALL, VERIFICATION_PENDING, VERIFICATION_REJECTED,
};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => VERIFICATION_PENDING,
            VerificationStatus::Approved => VERIFICATION_APPROVED,
            VerificationStatus::Rejected => VERIFICATION_REJECTED,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            VERIFICATION_PENDING => Some(VerificationStatus::Pending),
            VERIFICATION_APPROVED => Some(VerificationStatus::Approved),
            VERIFICATION_REJECTED => Some(VerificationStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin listing filter: a concrete status or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(VerificationStatus),
}

impl StatusFilter {
    pub fn parse(s: &str) -> AppResult<Self> {
        let value = s.trim().to_ascii_lowercase();
        if value.is_empty() || value == VERIFICATION_FILTER_ALL {
            return Ok(StatusFilter::All);
        }
        VerificationStatus::parse(&value)
            .map(StatusFilter::Only)
            .ok_or_else(|| {
                AppError::field(
                    "status",
                    "status must be one of pending, approved, rejected, all",
                )
            })
    }

    pub fn status(&self) -> Option<VerificationStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }
}

/// What the doctor submitted. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doctor_nic: String,
    pub specialization: String,
    pub qualifications: String,
    pub license_document_url: String,
    pub registration_details: String,
    pub submitted_at: DateTime<Utc>,
}

/// Who reviewed a verification, when, and any notes they left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub reviewed_by: Uuid,
    pub reviewed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Review {
    pub fn now(reviewed_by: Uuid, notes: Option<String>) -> Self {
        Self {
            reviewed_by,
            reviewed_at: Utc::now(),
            notes: notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Non-blank rejection reason, kept exactly as the reviewer wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionReason(String);

impl RejectionReason {
    pub fn new(reason: impl Into<String>) -> AppResult<Self> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(AppError::field("reason", "Rejection reason is required"));
        }
        Ok(Self(reason))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approved {
    review: Review,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    review: Review,
    reason: RejectionReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification<S> {
    application: Application,
    state: S,
}

impl<S> Verification<S> {
    pub fn application(&self) -> &Application {
        &self.application
    }
}

impl Verification<Pending> {
    /// A freshly submitted application.
    pub fn submit(application: Application) -> Self {
        Self {
            application,
            state: Pending,
        }
    }

    pub fn approve(self, review: Review) -> Verification<Approved> {
        Verification {
            application: self.application,
            state: Approved { review },
        }
    }

    pub fn reject(self, review: Review, reason: RejectionReason) -> Verification<Rejected> {
        Verification {
            application: self.application,
            state: Rejected { review, reason },
        }
    }
}

impl Verification<Approved> {
    /// Column values to persist for this transition.
    pub fn outcome(&self) -> ReviewOutcome {
        ReviewOutcome {
            status: VerificationStatus::Approved,
            reviewed_by: self.state.review.reviewed_by,
            reviewed_at: self.state.review.reviewed_at,
            notes: self.state.review.notes.clone(),
            rejection_reason: None,
        }
    }
}

impl Verification<Rejected> {
    pub fn reason(&self) -> &RejectionReason {
        &self.state.reason
    }

    /// Column values to persist for this transition.
    pub fn outcome(&self) -> ReviewOutcome {
        ReviewOutcome {
            status: VerificationStatus::Rejected,
            reviewed_by: self.state.review.reviewed_by,
            reviewed_at: self.state.review.reviewed_at,
            notes: self.state.review.notes.clone(),
            rejection_reason: Some(self.state.reason.as_str().to_string()),
        }
    }
}

/// The persisted result of a review. Only built from a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    status: VerificationStatus,
    reviewed_by: Uuid,
    reviewed_at: DateTime<Utc>,
    notes: Option<String>,
    rejection_reason: Option<String>,
}

impl ReviewOutcome {
    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    pub fn reviewed_by(&self) -> Uuid {
        self.reviewed_by
    }

    pub fn reviewed_at(&self) -> DateTime<Utc> {
        self.reviewed_at
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }
}

/// A verification loaded from storage, whatever its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyVerification {
    Pending(Verification<Pending>),
    Approved(Verification<Approved>),
    Rejected(Verification<Rejected>),
}

impl AnyVerification {
    /// Rebuild a stored verification, checking that the review columns
    /// agree with the status.
    pub fn restore(
        application: Application,
        status: VerificationStatus,
        review: Option<Review>,
        rejection_reason: Option<String>,
    ) -> AppResult<Self> {
        let id = application.id;
        let corrupt = move |what: &str| {
            AppError::internal(format!("verification {} is {} but {}", id, status, what))
        };

        match (status, review) {
            (VerificationStatus::Pending, None) => {
                Ok(AnyVerification::Pending(Verification::submit(application)))
            }
            (VerificationStatus::Pending, Some(_)) => Err(corrupt("has review columns set")),
            (VerificationStatus::Approved, Some(review)) => {
                Ok(AnyVerification::Approved(Verification {
                    application,
                    state: Approved { review },
                }))
            }
            (VerificationStatus::Rejected, Some(review)) => {
                let reason = rejection_reason
                    .ok_or_else(|| corrupt("has no rejection reason"))
                    .and_then(|r| RejectionReason::new(r))?;
                Ok(AnyVerification::Rejected(Verification {
                    application,
                    state: Rejected { review, reason },
                }))
            }
            (_, None) => Err(corrupt("has no review columns")),
        }
    }

    pub fn status(&self) -> VerificationStatus {
        match self {
            AnyVerification::Pending(_) => VerificationStatus::Pending,
            AnyVerification::Approved(_) => VerificationStatus::Approved,
            AnyVerification::Rejected(_) => VerificationStatus::Rejected,
        }
    }

    pub fn application(&self) -> &Application {
        match self {
            AnyVerification::Pending(v) => v.application(),
            AnyVerification::Approved(v) => v.application(),
            AnyVerification::Rejected(v) => v.application(),
        }
    }

    /// The only way back to a reviewable verification.
    pub fn into_pending(self) -> AppResult<Verification<Pending>> {
        match self {
            AnyVerification::Pending(v) => Ok(v),
            other => Err(AppError::conflict(format!(
                "Verification has already been {}",
                other.status()
            ))),
        }
    }
}

impl From<Verification<Pending>> for AnyVerification {
    fn from(v: Verification<Pending>) -> Self {
        AnyVerification::Pending(v)
    }
}

impl From<Verification<Approved>> for AnyVerification {
    fn from(v: Verification<Approved>) -> Self {
        AnyVerification::Approved(v)
    }
}

impl From<Verification<Rejected>> for AnyVerification {
    fn from(v: Verification<Rejected>) -> Self {
        AnyVerification::Rejected(v)
    }
}

/// Verification as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct VerificationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "200469201396")]
    pub doctor_nic: String,
    #[schema(example = "Gynecology")]
    pub specialization: String,
    #[schema(example = "MBBS, MD (OBGYN)")]
    pub qualifications: String,
    #[schema(example = "https://cdn.example.com/uploads/licenses/4f1c.pdf")]
    pub license_document_url: String,
    pub registration_details: String,
    pub status: VerificationStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub review_notes: Option<String>,
}

impl From<AnyVerification> for VerificationRecord {
    fn from(verification: AnyVerification) -> Self {
        let status = verification.status();
        let (application, review, rejection_reason) = match verification {
            AnyVerification::Pending(v) => (v.application, None, None),
            AnyVerification::Approved(v) => (v.application, Some(v.state.review), None),
            AnyVerification::Rejected(v) => (
                v.application,
                Some(v.state.review),
                Some(v.state.reason.0),
            ),
        };

        Self {
            id: application.id,
            user_id: application.user_id,
            doctor_nic: application.doctor_nic,
            specialization: application.specialization,
            qualifications: application.qualifications,
            license_document_url: application.license_document_url,
            registration_details: application.registration_details,
            status,
            submitted_at: application.submitted_at,
            reviewed_at: review.as_ref().map(|r| r.reviewed_at),
            reviewed_by: review.as_ref().map(|r| r.reviewed_by),
            review_notes: review.and_then(|r| r.notes),
            rejection_reason,
        }
    }
}

/// Applicant fields joined onto admin listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Applicant {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Admin listing row: verification plus applicant contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct VerificationListItem {
    #[serde(flatten)]
    pub verification: VerificationRecord,
    pub applicant: Option<Applicant>,
}
