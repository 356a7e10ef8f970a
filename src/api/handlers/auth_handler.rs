//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Nic, UserRole};
use crate::errors::{AppError, AppResult, FieldError};
use crate::services::{DoctorApplication, RegisteredUser, Registration, TokenResponse};
use crate::types::{ApiResponse, Created};

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Sri Lankan NIC, old (`YYDDDSSSSV`) or new (`YYYYDDDSSSSC`) format
    #[validate(length(min = 1, message = "NIC is required"))]
    #[schema(example = "200469201396")]
    pub nic: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "nimali@example.com")]
    pub email: String,
    /// Minimum 8 characters
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    #[schema(example = "Nimali Perera")]
    pub full_name: String,
    #[validate(length(max = 20, message = "Phone number is too long"))]
    #[schema(example = "+94771234567")]
    pub phone: Option<String>,
    /// `user` (default) or `doctor`
    pub role: Option<UserRole>,
    #[schema(example = "Gynecology")]
    pub specialization: Option<String>,
    #[schema(example = "MBBS, MD (OBGYN)")]
    pub qualifications: Option<String>,
    /// URL returned by `POST /api/upload/license`
    #[validate(url(message = "License document must be a URL"))]
    pub license_document_url: Option<String>,
    #[schema(example = "SLMC 12345")]
    pub registration_details: Option<String>,
}

impl RegisterRequest {
    /// Parse the NIC and gather the doctor credentials, reporting every
    /// missing doctor field at once.
    fn into_registration(self) -> AppResult<Registration> {
        let nic = Nic::parse(&self.nic)?;
        let role = self.role.unwrap_or(UserRole::User);

        let application = if role.is_doctor() {
            let mut missing = Vec::new();
            let specialization = required(self.specialization, "specialization", &mut missing);
            let qualifications = required(self.qualifications, "qualifications", &mut missing);
            let license_document_url = required(
                self.license_document_url,
                "license_document_url",
                &mut missing,
            );
            if !missing.is_empty() {
                return Err(AppError::InvalidFields(missing));
            }

            Some(DoctorApplication {
                specialization,
                qualifications,
                license_document_url,
                registration_details: self
                    .registration_details
                    .map(|d| d.trim().to_string())
                    .unwrap_or_default(),
            })
        } else {
            None
        };

        Ok(Registration {
            nic,
            email: self.email,
            password: self.password,
            full_name: self.full_name,
            phone: self.phone.filter(|p| !p.trim().is_empty()),
            role,
            application,
        })
    }
}

fn required(value: Option<String>, field: &str, missing: &mut Vec<FieldError>) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(FieldError::new(
                field,
                format!("{} is required for doctor registration", field),
            ));
            String::new()
        }
    }
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "nimali@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a user or doctor
///
/// Doctor registrations also submit a pending credential verification.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisteredUser),
        (status = 400, description = "Validation error"),
        (status = 409, description = "NIC or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<RegisteredUser>> {
    let registration = payload.into_registration()?;
    let registered = state.auth_service.register(registration).await?;

    let message = if registered.verification.is_some() {
        "Registration successful. Your credentials are awaiting review."
    } else {
        "Registration successful"
    };
    Ok(Created(ApiResponse::with_message(registered, message)))
}

/// Login and get a JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account suspended or pending")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(ApiResponse::success(token)))
}
