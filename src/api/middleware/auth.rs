//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
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
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    let current_user = CurrentUser {
        id: claims.sub,
        username: claims.username,
        role: UserRole::from(claims.role.as_str()),
    };

    request.extensions_mut().insert(current_user);

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

/// Allow acting on one's own account, or on any account as an admin.
pub fn require_self_or_admin(user: &CurrentUser, target_id: &str) -> Result<(), AppError> {
    if user.id == target_id {
        Ok(())
    } else {
        require_admin(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, role: UserRole) -> CurrentUser {
        CurrentUser {
            id: id.into(),
            username: format!("{}-name", id),
            role,
        }
    }

    #[test]
    fn test_self_or_admin() {
        let student = user("u1", UserRole::Student);
        assert!(require_self_or_admin(&student, "u1").is_ok());
        assert!(matches!(
            require_self_or_admin(&student, "u2"),
            Err(AppError::Forbidden)
        ));

        let admin = user("a1", UserRole::Admin);
        assert!(require_self_or_admin(&admin, "u2").is_ok());
        assert!(require_admin(&admin).is_ok());
        assert!(require_admin(&user("t1", UserRole::Teacher)).is_err());
    }
}
