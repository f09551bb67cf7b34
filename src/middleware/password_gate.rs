//! Must-change-password gate.
//!
//! Accounts created with a temporary password are blocked from the domain
//! routes until they set their own. The auth routes that resolve the flag
//! (set-new-password, change-password, profile, refresh) live in a group
//! without this layer, so no path allowlist is needed here.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::middleware::AuthUser;

pub async fn require_password_current(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::internal("Erro interno do servidor"))?;

    if user.needs_password_change {
        return Err(ApiError::PasswordChangeRequired(
            "Você deve definir uma nova senha antes de continuar".into(),
        ));
    }
    Ok(next.run(request).await)
}
