use axum::extract::FromRequestParts;

use crate::{error::AppError, state::AppState};

pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Guard for admin-only routes. The system has no user accounts; admin
/// access is a single shared password carried in a request header and
/// checked against configuration.
#[derive(Debug, Clone)]
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let supplied = parts
            .headers
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        if supplied != state.config.admin_password {
            return Err(AppError::Unauthorized);
        }

        Ok(AdminAuth)
    }
}
