//! Doctor profile: the dashboard-facing projection of a doctor account.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::DEFAULT_SPECIALIZATION;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "200469201396")]
    pub nic: String,
    #[schema(example = "General")]
    pub specialization: String,
    pub qualifications: Option<String>,
    pub is_verified: bool,
    pub rating: f64,
    pub total_articles: i32,
    pub total_views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written when a profile is created or refreshed from a review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorProfileUpdate {
    pub user_id: Uuid,
    pub nic: String,
    pub specialization: String,
    pub qualifications: Option<String>,
    pub is_verified: bool,
}

impl DoctorProfileUpdate {
    /// Unverified profile for a doctor who has not been reviewed yet
    pub fn default_for(user_id: Uuid, nic: impl Into<String>) -> Self {
        Self {
            user_id,
            nic: nic.into(),
            specialization: DEFAULT_SPECIALIZATION.to_string(),
            qualifications: None,
            is_verified: false,
        }
    }
}
