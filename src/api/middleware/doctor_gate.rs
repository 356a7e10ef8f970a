//! Doctor access gate.
//!
//! Runs after `auth_middleware` on doctor-only routes. Resolves the
//! caller's doctor profile and, when `REQUIRE_VERIFIED_DOCTOR` is on,
//! refuses doctors whose credentials have not been approved.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::{require_role, CurrentUser};
use crate::api::AppState;
use crate::domain::{Doctor, UserRole};
use crate::errors::{AppError, OptionExt};

/// The caller's doctor profile, available to handlers behind the gate
#[derive(Clone, Debug)]
pub struct CurrentDoctor(pub Doctor);

pub async fn doctor_gate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = {
        let user = request
            .extensions()
            .get::<CurrentUser>()
            .ok_or(AppError::Unauthorized)?;
        require_role(user, UserRole::Doctor)?;
        user.id
    };

    let doctor = state
        .doctor_service
        .find_profile(user_id)
        .await?
        .ok_or_not_found("Doctor profile")?;

    if state.config.require_verified_doctor && !doctor.is_verified {
        tracing::debug!(user_id = %doctor.user_id, "Unverified doctor refused");
        return Err(AppError::VerificationRequired);
    }

    request.extensions_mut().insert(CurrentDoctor(doctor));
    Ok(next.run(request).await)
}
