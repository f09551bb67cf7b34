//! First-run bootstrap: report whether any user exists, and create the
//! first admin behind the install key.

use axum::http::StatusCode;
use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::auth::password;
use crate::database::models::{InitAdminRequest, Role};
use crate::database::repository::users;
use crate::error::ApiError;
use crate::handlers::{is_valid_email, success, AppJson};
use crate::state::AppState;

pub async fn check(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let user_count = users::count(&state.pool).await?;
    Ok(success(json!({
        "initialized": user_count > 0,
        "userCount": user_count,
    })))
}

pub async fn create_admin(
    State(state): State<AppState>,
    AppJson(req): AppJson<InitAdminRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // bootstrap is a one-shot: any existing user closes the door for good
    let user_count = users::count(&state.pool).await?;
    if user_count > 0 {
        return Err(ApiError::forbidden("Sistema já possui usuários cadastrados"));
    }

    if req.install_key != state.config.install_key {
        return Err(ApiError::unauthorized("Chave de instalação inválida"));
    }

    if !is_valid_email(&req.email) || req.password.chars().count() < 6 || req.name.chars().count() < 2 {
        return Err(ApiError::bad_request("Dados de entrada inválidos"));
    }

    let hash = password::hash_password(&req.password)?;
    let admin = users::create(
        &state.pool,
        users::NewUser {
            email: &req.email,
            password_hash: &hash,
            name: &req.name,
            role: Role::Admin,
            company_id: None,
            needs_password_change: false,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Usuário administrador criado com sucesso",
            "data": {
                "userId": admin.id,
                "email": admin.email,
                "name": admin.name,
                "role": admin.role,
            },
        })),
    ))
}
