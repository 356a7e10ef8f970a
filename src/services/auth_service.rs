//! Authentication service - registration, login and token handling.
//!
//! Doctor registration also submits the doctor's verification in the same
//! transaction, so an account never exists without its application.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{
    Application, NewUser, Nic, Password, User, UserResponse, UserRole,
    VerificationRecord,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub nic: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Credentials a doctor submits at sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorApplication {
    pub specialization: String,
    pub qualifications: String,
    pub license_document_url: String,
    pub registration_details: String,
}

/// A validated sign-up request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub nic: Nic,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    /// Required when `role` is doctor, ignored otherwise
    pub application: Option<DoctorApplication>,
}

/// Result of a successful registration
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    pub user: UserResponse,
    /// Present for doctor registrations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationRecord>,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account; doctors also get a pending verification.
    async fn register(&self, registration: Registration) -> AppResult<RegisteredUser>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        nic: user.nic.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        user: UserResponse::from(user.clone()),
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<RegisteredUser> {
        let Registration {
            nic,
            email,
            password,
            full_name,
            phone,
            role,
            application,
        } = registration;

        let application = match role {
            UserRole::Admin => {
                return Err(AppError::field(
                    "role",
                    "Admin accounts cannot be self-registered",
                ))
            }
            UserRole::User => None,
            UserRole::Doctor => Some(application.ok_or_else(|| {
                AppError::field(
                    "license_document_url",
                    "Doctors must submit their credentials to register",
                )
            })?),
        };

        let password_hash = Password::new(&password)?.into_string();
        let new_user = NewUser {
            nic: nic.as_str().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            full_name: full_name.trim().to_string(),
            phone,
            role,
            gender: nic.gender(),
            date_of_birth: nic.date_of_birth(),
        };

        let registered = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.users().find_by_nic(&new_user.nic).await?.is_some() {
                        return Err(AppError::conflict("NIC is already registered"));
                    }
                    if ctx.users().find_by_email(&new_user.email).await?.is_some() {
                        return Err(AppError::conflict("Email is already registered"));
                    }

                    let user = ctx.users().create(new_user).await?;

                    let verification = match application {
                        Some(app) => {
                            let submitted = ctx
                                .verifications()
                                .create(Application {
                                    id: Uuid::new_v4(),
                                    user_id: user.id,
                                    doctor_nic: user.nic.clone(),
                                    specialization: app.specialization,
                                    qualifications: app.qualifications,
                                    license_document_url: app.license_document_url,
                                    registration_details: app.registration_details,
                                    submitted_at: Utc::now(),
                                })
                                .await?;
                            Some(submitted)
                        }
                        None => None,
                    };

                    Ok((user, verification))
                })
            })
            .await;

        let (user, verification) = registered?;
        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            "User registered"
        );
        if verification.is_some() {
            tracing::info!(user_id = %user.id, "Doctor verification submitted");
        }

        Ok(RegisteredUser {
            user: UserResponse::from(user),
            verification: verification.map(VerificationRecord::from),
        })
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let email = email.trim().to_lowercase();
        let user = self.uow.users().find_by_email(&email).await?;

        // Verify against a placeholder when the account is unknown so both
        // paths cost one Argon2 verification.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.as_str()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::warn!("Failed login attempt");
                return Err(AppError::InvalidCredentials);
            }
        };

        user.account_status.ensure_can_sign_in()?;

        if user.is_doctor() {
            self.uow.doctors().ensure_profile(user.id, &user.nic).await?;
        }

        tracing::info!(user_id = %user.id, "User logged in");
        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountStatus, Doctor, DoctorProfileUpdate};
    use crate::infra::{MockDoctorRepository, MockUserRepository};
    use crate::services::testing::TestUnitOfWork;

    const SECRET: &str = "unit-test-secret-key-with-32-plus-chars";

    fn user_with_password(role: UserRole, status: AccountStatus, password: &str) -> User {
        let nic = Nic::parse("200469201396").unwrap();
        User {
            id: Uuid::new_v4(),
            nic: nic.as_str().to_string(),
            email: "nimali@example.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            full_name: "Nimali Perera".to_string(),
            phone: None,
            role,
            account_status: status,
            gender: nic.gender(),
            date_of_birth: nic.date_of_birth(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(uow: TestUnitOfWork) -> Authenticator<TestUnitOfWork> {
        Authenticator::new(Arc::new(uow), Config::new("sqlite::memory:", SECRET))
    }

    #[tokio::test]
    async fn test_login_success_returns_token_for_user() {
        let user = user_with_password(UserRole::User, AccountStatus::Active, "CycleTracker1");
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "nimali@example.com")
            .returning(move |_| Ok(Some(user.clone())));

        let auth = service(TestUnitOfWork::default().with_users(users));
        let token = auth
            .login("  Nimali@Example.com ".into(), "CycleTracker1".into())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.user.id, user_id);
        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "user");
        assert_eq!(claims.nic, "200469201396");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = user_with_password(UserRole::User, AccountStatus::Active, "CycleTracker1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = service(TestUnitOfWork::default().with_users(users));
        let result = auth.login("nimali@example.com".into(), "wrong-pass".into()).await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let auth = service(TestUnitOfWork::default().with_users(users));
        let result = auth.login("ghost@example.com".into(), "whatever1".into()).await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_suspended_account() {
        let user = user_with_password(UserRole::User, AccountStatus::Suspended, "CycleTracker1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = service(TestUnitOfWork::default().with_users(users));
        let result = auth
            .login("nimali@example.com".into(), "CycleTracker1".into())
            .await;

        assert!(matches!(result, Err(AppError::AccountInactive(ref s)) if s == "suspended"));
    }

    #[tokio::test]
    async fn test_doctor_login_ensures_profile() {
        let user = user_with_password(UserRole::Doctor, AccountStatus::Active, "CycleTracker1");
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let mut doctors = MockDoctorRepository::new();
        doctors
            .expect_ensure_profile()
            .withf(move |id, nic| *id == user_id && nic == "200469201396")
            .times(1)
            .returning(|id, nic| {
                let update = DoctorProfileUpdate::default_for(id, nic);
                Ok(Doctor {
                    id: Uuid::new_v4(),
                    user_id: update.user_id,
                    nic: update.nic,
                    specialization: update.specialization,
                    qualifications: None,
                    is_verified: false,
                    rating: 0.0,
                    total_articles: 0,
                    total_views: 0,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let auth = service(
            TestUnitOfWork::default()
                .with_users(users)
                .with_doctors(doctors),
        );
        let token = auth
            .login("nimali@example.com".into(), "CycleTracker1".into())
            .await
            .unwrap();

        assert_eq!(token.user.role, UserRole::Doctor);
    }

    #[tokio::test]
    async fn test_register_doctor_without_application() {
        let auth = service(TestUnitOfWork::default());
        let result = auth
            .register(Registration {
                nic: Nic::parse("200469201396").unwrap(),
                email: "dr@example.com".into(),
                password: "CycleTracker1".into(),
                full_name: "Dr. Silva".into(),
                phone: None,
                role: UserRole::Doctor,
                application: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidFields(_))));
    }

    #[tokio::test]
    async fn test_register_admin_refused() {
        let auth = service(TestUnitOfWork::default());
        let result = auth
            .register(Registration {
                nic: Nic::parse("200469201396").unwrap(),
                email: "root@example.com".into(),
                password: "CycleTracker1".into(),
                full_name: "Root".into(),
                phone: None,
                role: UserRole::Admin,
                application: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidFields(ref f)) if f[0].field == "role"));
    }

    #[test]
    fn test_verify_token_rejects_garbage() {
        let auth = service(TestUnitOfWork::default());
        assert!(matches!(
            auth.verify_token("not.a.token"),
            Err(AppError::Jwt(_))
        ));
    }
}
