//! Minimum-role gates, layered after authentication per route group.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::middleware::AuthUser;

pub async fn require_manager(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = current_user(&request)?;
    if !user.role.is_manager_or_admin() {
        return Err(ApiError::forbidden(
            "Acesso negado. Apenas administradores e gerentes têm permissão",
        ));
    }
    Ok(next.run(request).await)
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = current_user(&request)?;
    if !user.role.is_admin() {
        return Err(ApiError::forbidden("Acesso negado. Apenas administradores têm permissão"));
    }
    Ok(next.run(request).await)
}

fn current_user(request: &Request) -> Result<&AuthUser, ApiError> {
    // only reachable behind auth_middleware; absence is a wiring bug
    request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::internal("Erro interno do servidor"))
}
