use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{self, ADMIN_ROLE};

/// Administrator extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require an admin token.
pub struct AdminUser {
    pub subject: String,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let secret = &state.config.auth.jwt_secret;
        if secret.is_empty() {
            return Err(AppError::TokenInvalid);
        }
        let claims = jwt::verify(secret, token)
            .map_err(|_| AppError::TokenInvalid)?;

        if claims.role != ADMIN_ROLE {
            return Err(AppError::PermissionDenied);
        }

        Ok(AdminUser {
            subject: claims.sub,
        })
    }
}
