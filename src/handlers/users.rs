//! User administration for managers and admins. All role and tenant rules
//! are consulted in `auth::policy` before any write.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::auth::{password, policy};
use crate::database::models::{CreateUserRequest, UserPatch};
use crate::database::repository::{companies, users};
use crate::error::ApiError;
use crate::handlers::{is_valid_email, parse_uuid, success, success_message, AppJson};
use crate::middleware::AuthUser;
use crate::state::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppJson(req): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let actor = auth.actor();

    if req.name.chars().count() < 2 || !is_valid_email(&req.email) {
        return Err(ApiError::bad_request("Dados de entrada inválidos"));
    }

    policy::can_create_user_with_role(&actor, req.role)?;
    let company_id = policy::resolve_new_user_company(&actor, req.company_id)?;

    if !companies::is_active(&state.pool, company_id).await? {
        return Err(ApiError::bad_request("Empresa não encontrada ou inativa"));
    }

    password::validate_password(&req.temporary_password).map_err(ApiError::bad_request)?;

    if users::email_exists(&state.pool, &req.email, None).await? {
        return Err(ApiError::conflict("Email já está em uso"));
    }

    let hash = password::hash_password(&req.temporary_password)?;
    let user = users::create(
        &state.pool,
        users::NewUser {
            email: &req.email,
            password_hash: &hash,
            name: &req.name,
            role: req.role,
            company_id: Some(company_id),
            needs_password_change: true,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, success(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let scope = policy::list_scope(&auth.actor())?;
    let users = users::list(&state.pool, scope).await?;
    Ok(success(users))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UserPatch>,
) -> Result<Json<Value>, ApiError> {
    let user_id = parse_uuid(&id).map_err(|_| ApiError::bad_request("ID do usuário inválido"))?;

    let target = users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;

    policy::can_update_user(&auth.actor(), target.role, target.company_id, &patch)?;

    if patch.is_empty() {
        return Err(ApiError::bad_request("Nenhum campo foi fornecido para atualização"));
    }

    if let Some(email) = &patch.email {
        if !is_valid_email(email) {
            return Err(ApiError::bad_request("Dados de entrada inválidos"));
        }
        if users::email_exists(&state.pool, email, Some(user_id)).await? {
            return Err(ApiError::conflict("Email já está em uso"));
        }
    }

    if let Some(company_id) = patch.company_id {
        if !companies::is_active(&state.pool, company_id).await? {
            return Err(ApiError::bad_request("Empresa não encontrada ou inativa"));
        }
    }

    let updated = users::update(&state.pool, user_id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;

    Ok(success(updated))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = parse_uuid(&id).map_err(|_| ApiError::bad_request("ID de usuário inválido"))?;

    let target = users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;

    policy::can_delete_user(&auth.actor(), target.id, target.role, target.company_id)?;

    users::delete(&state.pool, user_id).await?;

    Ok(success_message(
        "Usuário excluído com sucesso",
        json!({
            "deletedUser": {
                "id": target.id,
                "name": target.name,
                "email": target.email,
                "role": target.role,
            }
        }),
    ))
}
