use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::Value;

use crate::auth::policy;
use crate::database::models::{CreateTeamRequest, TeamPatch};
use crate::database::repository::{developers, teams};
use crate::error::ApiError;
use crate::handlers::developers::ListQuery;
use crate::handlers::{parse_uuid, success, success_message, AppJson};
use crate::middleware::AuthUser;
use crate::state::AppState;

const DEFAULT_COLOR: &str = "blue";

pub async fn list_teams(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let scope = policy::list_scope(&auth.actor())?;
    let teams = teams::list(&state.pool, scope).await?;
    Ok(success(teams))
}

pub async fn get_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let team_id = parse_uuid(&id)?;

    let team = teams::find_by_id(&state.pool, team_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Time não encontrado"))?;

    policy::can_read_scoped(&auth.actor(), team.company_id)?;
    Ok(success(team))
}

pub async fn create_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppJson(req): AppJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("Nome é obrigatório"));
    }

    let company_id = policy::resolve_owned_company(&auth.actor(), req.company_id)?;
    let color = if req.color.is_empty() { DEFAULT_COLOR } else { req.color.as_str() };

    let team = teams::create(&state.pool, &req.name, &req.description, color, company_id).await?;
    Ok((StatusCode::CREATED, success(team)))
}

pub async fn update_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<TeamPatch>,
) -> Result<Json<Value>, ApiError> {
    let team_id = parse_uuid(&id)?;

    let team = teams::find_by_id(&state.pool, team_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Time não encontrado"))?;

    policy::can_write_scoped(&auth.actor(), team.company_id)?;

    if patch.is_empty() {
        return Err(ApiError::bad_request("Nenhum campo para atualizar"));
    }

    let updated = teams::update(&state.pool, team_id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Time não encontrado"))?;

    Ok(success(updated))
}

pub async fn delete_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let team_id = parse_uuid(&id)?;

    let team = teams::find_by_id(&state.pool, team_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Time não encontrado"))?;

    policy::can_write_scoped(&auth.actor(), team.company_id)?;

    teams::delete(&state.pool, team_id).await?;
    Ok(success_message("Time excluído com sucesso", Value::Null))
}

pub async fn list_team_developers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(team_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let team_id = parse_uuid(&team_id).map_err(|_| ApiError::bad_request("ID do time inválido"))?;

    let team = teams::find_by_id(&state.pool, team_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Time não encontrado"))?;

    policy::can_read_scoped(&auth.actor(), team.company_id)?;

    let developers =
        developers::list_by_team(&state.pool, team_id, query.include_archived()).await?;
    Ok(success(developers))
}
