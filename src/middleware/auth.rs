use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::policy::Actor;
use crate::auth::verify_token;
use crate::database::models::Role;
use crate::database::repository::users;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context injected into the request extensions.
///
/// Built from the verified token plus a fresh user row, so deactivations
/// and company moves take effect on the next request, not at token expiry.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub company_id: Option<Uuid>,
    pub needs_password_change: bool,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor { user_id: self.id, role: self.role, company_id: self.company_id }
    }
}

/// Bearer-token authentication for every protected route group.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;

    let claims = verify_token(&token, &state.config.jwt_secret)
        .map_err(|_| ApiError::unauthorized("Token inválido ou expirado"))?;

    let user = users::find_by_id(&state.pool, claims.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Token inválido ou expirado"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("Usuário inativo"));
    }

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
        role: user.role,
        company_id: user.company_id,
        needs_password_change: user.needs_password_change,
    });

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Token de autorização não fornecido"))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Formato de token inválido. Use 'Bearer <token>'"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ApiError::unauthorized("Formato de token inválido. Use 'Bearer <token>'")),
    }
}
