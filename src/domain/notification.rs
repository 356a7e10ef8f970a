//! In-app notifications shown on the doctor dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::verification::{Approved, Rejected, Verification};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification about to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
}

impl NewNotification {
    pub fn verification_approved(verification: &Verification<Approved>) -> Self {
        Self {
            user_id: verification.application().user_id,
            title: "Verification approved".to_string(),
            message: "Your doctor credentials have been verified. Doctor features are now available."
                .to_string(),
        }
    }

    pub fn verification_rejected(verification: &Verification<Rejected>) -> Self {
        Self {
            user_id: verification.application().user_id,
            title: "Verification rejected".to_string(),
            message: format!(
                "Your doctor verification was rejected: {}",
                verification.reason().as_str()
            ),
        }
    }
}
