//! Admin handlers: credential review and account administration.
//!
//! Every route here sits behind `auth_middleware` and `admin_middleware`.

use axum::{
    extract::State,
    response::Json,
    routing::{get, patch, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{OptionalJson, PathParam, QueryParams, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{
    AccountStatus, RejectionReason, StatusFilter, UserResponse, UserRole, VerificationListItem,
    VerificationRecord,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, PaginationParams};

/// Query for the verification listing
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerificationQuery {
    /// `pending`, `approved`, `rejected` or `all` (default)
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default 20, max 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Query for the user listing
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    pub role: Option<UserRole>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Optional approval body
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ApproveRequest {
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Rejection body. `reason` must not be blank.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectRequest {
    #[serde(default)]
    #[validate(length(max = 2000, message = "Reason is too long"))]
    #[schema(example = "License document is unreadable")]
    pub reason: String,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "suspended")]
    pub status: AccountStatus,
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/pending-doctors", get(pending_doctors))
        .route("/all-doctor-verifications", get(all_doctor_verifications))
        .route("/approve-doctor/:doctor_id", post(approve_doctor))
        .route("/reject-doctor/:doctor_id", post(reject_doctor))
        .route("/users", get(list_users))
        .route("/users/:id/status", patch(update_user_status))
}

/// Pending verifications, newest submission first
#[utoipa::path(
    get,
    path = "/api/admin/pending-doctors",
    tag = "Admin",
    responses(
        (status = 200, description = "Pending verifications", body = [VerificationListItem]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn pending_doctors(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<VerificationListItem>>>> {
    let items = state.verification_service.list_pending().await?;
    Ok(Json(ApiResponse::success(items)))
}

/// All verifications, filtered by status and paginated
#[utoipa::path(
    get,
    path = "/api/admin/all-doctor-verifications",
    tag = "Admin",
    params(VerificationQuery),
    responses(
        (status = 200, description = "Page of verifications", body = [VerificationListItem]),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn all_doctor_verifications(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<VerificationQuery>,
) -> AppResult<Json<ApiResponse<Vec<VerificationListItem>>>> {
    let filter = match query.status.as_deref() {
        Some(status) => StatusFilter::parse(status)?,
        None => StatusFilter::All,
    };
    let params = PaginationParams::new(query.page, query.limit);

    let page = state.verification_service.list(filter, params).await?;
    Ok(Json(ApiResponse::paginated(page)))
}

/// Approve a doctor's pending verification
///
/// `doctor_id` is the doctor's user id.
#[utoipa::path(
    post,
    path = "/api/admin/approve-doctor/{doctor_id}",
    tag = "Admin",
    params(("doctor_id" = Uuid, Path, description = "Doctor's user id")),
    request_body(content = ApproveRequest, description = "Optional review notes"),
    responses(
        (status = 200, description = "Verification approved", body = VerificationRecord),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "No verification for this doctor"),
        (status = 409, description = "Verification already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_doctor(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    PathParam(doctor_id): PathParam<Uuid>,
    OptionalJson(body): OptionalJson<ApproveRequest>,
) -> AppResult<Json<ApiResponse<VerificationRecord>>> {

    let record = state
        .verification_service
        .approve(doctor_id, admin.id, body.notes)
        .await?;

    Ok(Json(ApiResponse::with_message(
        record,
        "Doctor verification approved",
    )))
}

/// Reject a doctor's pending verification
#[utoipa::path(
    post,
    path = "/api/admin/reject-doctor/{doctor_id}",
    tag = "Admin",
    params(("doctor_id" = Uuid, Path, description = "Doctor's user id")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Verification rejected", body = VerificationRecord),
        (status = 400, description = "Missing or blank reason"),
        (status = 404, description = "No verification for this doctor"),
        (status = 409, description = "Verification already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_doctor(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    PathParam(doctor_id): PathParam<Uuid>,
    ValidatedJson(body): ValidatedJson<RejectRequest>,
) -> AppResult<Json<ApiResponse<VerificationRecord>>> {
    let reason = RejectionReason::new(body.reason)?;

    let record = state
        .verification_service
        .reject(doctor_id, admin.id, reason, body.notes)
        .await?;

    Ok(Json(ApiResponse::with_message(
        record,
        "Doctor verification rejected",
    )))
}

/// List accounts, newest first
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(UserQuery),
    responses(
        (status = 200, description = "Page of users", body = [UserResponse]),
        (status = 400, description = "Unknown role")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<UserQuery>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let params = PaginationParams::new(query.page, query.limit);
    let page = state.user_service.list_users(query.role, params).await?;

    Ok(Json(ApiResponse::paginated(page.map(UserResponse::from))))
}

/// Change an account's status
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/status",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UserResponse),
        (status = 403, description = "Admins cannot change their own status"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .user_service
        .update_account_status(admin.id, id, body.status)
        .await?;

    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Account status updated",
    )))
}
