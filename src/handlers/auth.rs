//! Session endpoints: login, profile, token refresh and the two password
//! flows (forced reset and voluntary change).

use axum::response::IntoResponse;
use axum::{extract::State, Extension, Json};
use serde::Serialize;
use serde_json::Value;

use crate::auth::{issue_token, password};
use crate::database::models::{
    ChangePasswordRequest, LoginRequest, SetNewPasswordRequest, User,
};
use crate::database::repository::users;
use crate::error::ApiError;
use crate::handlers::{is_valid_email, success, success_message, AppJson};
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Serialize)]
struct SessionResponse {
    token: String,
    user: User,
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_email(&req.email) || req.password.is_empty() {
        return Err(ApiError::bad_request("Dados de entrada inválidos"));
    }

    let user = users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Credenciais inválidas"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("Usuário inativo"));
    }

    if !password::verify_password(&user.password, &req.password)? {
        return Err(ApiError::unauthorized("Credenciais inválidas"));
    }

    let token = issue_token(&user, &state.config.jwt_secret)
        .map_err(|_| ApiError::internal("Erro ao gerar token"))?;

    Ok(success(SessionResponse { token, user }))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let user = users::find_by_id(&state.pool, auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;
    Ok(success(user))
}

pub async fn refresh(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let user = users::find_by_id(&state.pool, auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("Usuário inativo"));
    }

    let token = issue_token(&user, &state.config.jwt_secret)
        .map_err(|_| ApiError::internal("Erro ao gerar token"))?;

    Ok(success(serde_json::json!({ "token": token })))
}

/// Forced reset for accounts created with a temporary password. Clears the
/// must-change flag and hands back a fresh token so the client can leave
/// the gate without logging in again.
pub async fn set_new_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppJson(req): AppJson<SetNewPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    password::validate_password(&req.new_password).map_err(ApiError::bad_request)?;

    let user = users::find_by_id(&state.pool, auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;

    if !user.needs_password_change {
        return Err(ApiError::bad_request("Usuário não precisa trocar a senha"));
    }

    let hash = password::hash_password(&req.new_password)?;
    users::update_password(&state.pool, user.id, &hash, true).await?;

    let refreshed = users::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;
    let token = issue_token(&refreshed, &state.config.jwt_secret)
        .map_err(|_| ApiError::internal("Erro ao gerar token"))?;

    Ok(success(SessionResponse { token, user: refreshed }))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    password::validate_password(&req.new_password).map_err(ApiError::bad_request)?;

    let user = users::find_by_id(&state.pool, auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;

    if !password::verify_password(&user.password, &req.current_password)? {
        return Err(ApiError::unauthorized("Senha atual incorreta"));
    }

    let hash = password::hash_password(&req.new_password)?;
    users::update_password(&state.pool, user.id, &hash, false).await?;

    Ok(success_message("Senha alterada com sucesso", Value::Null))
}
