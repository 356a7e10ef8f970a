//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, auth_handler, doctor_handler, upload_handler};
use crate::domain::{
    AccountStatus, Applicant, Doctor, Gender, Notification, UserResponse, UserRole,
    VerificationListItem, VerificationRecord, VerificationStatus,
};
use crate::errors::{ErrorResponse, FieldError};
use crate::services::{RegisteredUser, TokenResponse};
use crate::types::PaginationMeta;

/// OpenAPI documentation for the HerCycle doctor verification service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HerCycle Doctor Verification API",
        version = "0.1.0",
        description = "Doctor registration, credential review and the verified-doctor gate"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Uploads
        upload_handler::upload_license,
        // Admin endpoints
        admin_handler::pending_doctors,
        admin_handler::all_doctor_verifications,
        admin_handler::approve_doctor,
        admin_handler::reject_doctor,
        admin_handler::list_users,
        admin_handler::update_user_status,
        // Doctor endpoints
        doctor_handler::verification_status,
        doctor_handler::profile,
        doctor_handler::notifications,
        doctor_handler::mark_notification_read,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            AccountStatus,
            Gender,
            UserResponse,
            Doctor,
            Notification,
            VerificationStatus,
            VerificationRecord,
            VerificationListItem,
            Applicant,
            // Envelope types
            ErrorResponse,
            FieldError,
            PaginationMeta,
            // Request/response bodies
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            RegisteredUser,
            admin_handler::ApproveRequest,
            admin_handler::RejectRequest,
            admin_handler::UpdateStatusRequest,
            upload_handler::LicenseForm,
            upload_handler::UploadResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Upload", description = "License document upload"),
        (name = "Admin", description = "Credential review and account administration"),
        (name = "Doctor", description = "Verification status and doctor dashboard")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
