//! User domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::nic::Gender;
use crate::config::{
    ACCOUNT_ACTIVE, ACCOUNT_DELETED, ACCOUNT_PENDING, ACCOUNT_SUSPENDED, ROLE_ADMIN, ROLE_DOCTOR,
    ROLE_USER,
};
use crate::errors::{AppError, AppResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Doctor,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn is_doctor(&self) -> bool {
        matches!(self, UserRole::Doctor)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => ROLE_USER,
            UserRole::Doctor => ROLE_DOCTOR,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_DOCTOR => UserRole::Doctor,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account-level gate, independent of doctor credential verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Pending,
    Suspended,
    Deleted,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => ACCOUNT_ACTIVE,
            AccountStatus::Pending => ACCOUNT_PENDING,
            AccountStatus::Suspended => ACCOUNT_SUSPENDED,
            AccountStatus::Deleted => ACCOUNT_DELETED,
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            ACCOUNT_ACTIVE => Ok(AccountStatus::Active),
            ACCOUNT_PENDING => Ok(AccountStatus::Pending),
            ACCOUNT_SUSPENDED => Ok(AccountStatus::Suspended),
            ACCOUNT_DELETED => Ok(AccountStatus::Deleted),
            other => Err(AppError::field(
                "status",
                format!("Unknown account status '{}'", other),
            )),
        }
    }

    /// Whether the account may sign in and call authenticated endpoints.
    ///
    /// Deleted accounts are reported exactly like unknown ones.
    pub fn ensure_can_sign_in(&self) -> AppResult<()> {
        match self {
            AccountStatus::Active => Ok(()),
            AccountStatus::Deleted => Err(AppError::InvalidCredentials),
            other => Err(AppError::AccountInactive(other.as_str().to_string())),
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub nic: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub account_status: AccountStatus,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_doctor(&self) -> bool {
        self.role.is_doctor()
    }
}

/// Fields needed to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nic: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "200469201396")]
    pub nic: String,
    #[schema(example = "nimali@example.com")]
    pub email: String,
    #[schema(example = "Nimali Perera")]
    pub full_name: String,
    pub phone: Option<String>,
    #[schema(example = "doctor")]
    pub role: UserRole,
    #[schema(example = "active")]
    pub account_status: AccountStatus,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nic: user.nic,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            role: user.role,
            account_status: user.account_status,
            gender: user.gender,
            date_of_birth: user.date_of_birth,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_strings() {
        assert_eq!(UserRole::from("doctor"), UserRole::Doctor);
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        // Unknown values fall back to the least privileged role
        assert_eq!(UserRole::from("superuser"), UserRole::User);
        assert_eq!(UserRole::Doctor.to_string(), "doctor");
    }

    #[test]
    fn test_account_status_gate() {
        assert!(AccountStatus::Active.ensure_can_sign_in().is_ok());
        assert!(matches!(
            AccountStatus::Suspended.ensure_can_sign_in(),
            Err(AppError::AccountInactive(ref s)) if s == "suspended"
        ));
        assert!(matches!(
            AccountStatus::Pending.ensure_can_sign_in(),
            Err(AppError::AccountInactive(_))
        ));
        assert!(matches!(
            AccountStatus::Deleted.ensure_can_sign_in(),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_account_status_parse() {
        assert_eq!(AccountStatus::parse("suspended").unwrap(), AccountStatus::Suspended);
        assert!(AccountStatus::parse("banned").is_err());
    }
}
