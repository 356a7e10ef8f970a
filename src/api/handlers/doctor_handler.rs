//! Doctor handlers.
//!
//! The verification status lookup only needs a signed-in caller; the
//! profile and notification routes sit behind the doctor gate.

use axum::{
    extract::State,
    response::Json,
    routing::{get, patch},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::PathParam;
use crate::api::middleware::{CurrentDoctor, CurrentUser};
use crate::api::AppState;
use crate::domain::{Doctor, Nic, Notification, UserRole, VerificationRecord};
use crate::errors::{AppError, AppResult};
use crate::types::ApiResponse;

/// Routes that need authentication only
pub fn doctor_status_routes() -> Router<AppState> {
    Router::new().route("/verification/:nic", get(verification_status))
}

/// Routes behind the doctor gate
pub fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile))
        .route("/notifications", get(notifications))
        .route("/notifications/:id/read", patch(mark_notification_read))
}

/// Verification record for a NIC
///
/// Doctors may read only their own record; admins may read any.
#[utoipa::path(
    get,
    path = "/api/doctor/verification/{nic}",
    tag = "Doctor",
    params(("nic" = String, Path, description = "Doctor's NIC")),
    responses(
        (status = 200, description = "Verification record", body = VerificationRecord),
        (status = 400, description = "Malformed NIC"),
        (status = 403, description = "Record belongs to someone else"),
        (status = 404, description = "No verification for this NIC")
    ),
    security(("bearer_auth" = []))
)]
pub async fn verification_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    PathParam(nic): PathParam<String>,
) -> AppResult<Json<ApiResponse<VerificationRecord>>> {
    match user.role {
        UserRole::Admin => {}
        UserRole::Doctor => {
            if Nic::parse(&nic)?.as_str() != user.nic {
                return Err(AppError::Forbidden);
            }
        }
        UserRole::User => return Err(AppError::Forbidden),
    }

    let record = state.verification_service.get_by_nic(&nic).await?;
    Ok(Json(ApiResponse::success(record)))
}

/// The caller's doctor profile and dashboard counters
#[utoipa::path(
    get,
    path = "/api/doctor/profile",
    tag = "Doctor",
    responses(
        (status = 200, description = "Doctor profile", body = Doctor),
        (status = 403, description = "Not a doctor, or not yet verified"),
        (status = 404, description = "Doctor profile missing")
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(
    Extension(CurrentDoctor(doctor)): Extension<CurrentDoctor>,
) -> Json<ApiResponse<Doctor>> {
    Json(ApiResponse::success(doctor))
}

/// The caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/doctor/notifications",
    tag = "Doctor",
    responses(
        (status = 200, description = "Notifications", body = [Notification]),
        (status = 403, description = "Not a doctor, or not yet verified")
    ),
    security(("bearer_auth" = []))
)]
pub async fn notifications(
    State(state): State<AppState>,
    Extension(CurrentDoctor(doctor)): Extension<CurrentDoctor>,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let items = state.doctor_service.notifications(doctor.user_id).await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Mark one of the caller's notifications as read
#[utoipa::path(
    patch,
    path = "/api/doctor/notifications/{id}/read",
    tag = "Doctor",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification updated", body = Notification),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(CurrentDoctor(doctor)): Extension<CurrentDoctor>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = state
        .doctor_service
        .mark_notification_read(doctor.user_id, id)
        .await?;
    Ok(Json(ApiResponse::success(notification)))
}
