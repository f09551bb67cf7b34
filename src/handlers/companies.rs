//! Company (tenant) administration. Listing is open to managers, every
//! mutation is admin-only (enforced by the route-level gates).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::Value;

use crate::auth::policy;
use crate::database::models::{CompanyPatch, CreateCompanyRequest};
use crate::database::repository::companies;
use crate::error::ApiError;
use crate::handlers::{parse_uuid, success, success_message, AppJson};
use crate::middleware::AuthUser;
use crate::state::AppState;

pub async fn create_company(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if req.name.chars().count() < 2 {
        return Err(ApiError::bad_request("Dados de entrada inválidos"));
    }

    if companies::name_exists(&state.pool, &req.name, None).await? {
        return Err(ApiError::conflict("Já existe uma empresa com esse nome"));
    }

    let company = companies::create(&state.pool, &req.name, &req.description).await?;
    Ok((StatusCode::CREATED, success(company)))
}

pub async fn list_companies(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let scope = policy::list_scope(&auth.actor())?;
    let companies = companies::list(&state.pool, scope).await?;
    Ok(success(companies))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let company_id = parse_uuid(&id).map_err(|_| ApiError::bad_request("ID da empresa inválido"))?;

    let company = companies::find_by_id(&state.pool, company_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Empresa não encontrada"))?;

    Ok(success(company))
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<CompanyPatch>,
) -> Result<Json<Value>, ApiError> {
    let company_id = parse_uuid(&id).map_err(|_| ApiError::bad_request("ID da empresa inválido"))?;

    if companies::find_by_id(&state.pool, company_id).await?.is_none() {
        return Err(ApiError::not_found("Empresa não encontrada"));
    }

    if patch.is_empty() {
        return Err(ApiError::bad_request("Nenhum campo foi fornecido para atualização"));
    }

    if let Some(name) = &patch.name {
        if companies::name_exists(&state.pool, name, Some(company_id)).await? {
            return Err(ApiError::conflict("Já existe uma empresa com esse nome"));
        }
    }

    let updated = companies::update(&state.pool, company_id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Empresa não encontrada"))?;

    Ok(success(updated))
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let company_id = parse_uuid(&id).map_err(|_| ApiError::bad_request("ID da empresa inválido"))?;

    if companies::find_by_id(&state.pool, company_id).await?.is_none() {
        return Err(ApiError::not_found("Empresa não encontrada"));
    }

    // a tenant with users is never deleted out from under them
    if companies::count_users(&state.pool, company_id).await? > 0 {
        return Err(ApiError::conflict(
            "Não é possível excluir uma empresa que possui usuários associados",
        ));
    }

    companies::delete(&state.pool, company_id).await?;
    Ok(success_message("Empresa excluída com sucesso", Value::Null))
}
