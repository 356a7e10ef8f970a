//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated user resolved from the bearer token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub nic: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// JWT authentication middleware.
///
/// Validates the bearer token, then reloads the account so that role and
/// status changes apply to tokens issued before them. Suspended or pending
/// accounts get 403, deleted or missing ones 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
            .ok_or(AppError::Unauthorized)?;
        state.auth_service.verify_token(token)?
    };

    let user = match state.user_service.get_user(claims.sub).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => return Err(AppError::Unauthorized),
        Err(e) => return Err(e),
    };

    user.account_status
        .ensure_can_sign_in()
        .map_err(|e| match e {
            AppError::InvalidCredentials => AppError::Unauthorized,
            other => other,
        })?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        nic: user.nic,
        email: user.email,
        role: user.role,
    });

    Ok(next.run(request).await)
}

/// Admin gate, layered after `auth_middleware`.
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    require_admin(user)?;

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Require an exact role. Admins do not inherit doctor-only access.
pub fn require_role(user: &CurrentUser, required: UserRole) -> Result<(), AppError> {
    if user.role == required {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            nic: "200469201396".to_string(),
            email: "someone@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&user(UserRole::Admin)).is_ok());
        assert!(matches!(
            require_admin(&user(UserRole::Doctor)),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_require_role_is_exact() {
        assert!(require_role(&user(UserRole::Doctor), UserRole::Doctor).is_ok());
        assert!(require_role(&user(UserRole::Admin), UserRole::Doctor).is_err());
        assert!(require_role(&user(UserRole::User), UserRole::Doctor).is_err());
    }
}
