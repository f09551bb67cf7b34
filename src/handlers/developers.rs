use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::policy;
use crate::database::models::{ArchiveDeveloperRequest, CreateDeveloperRequest, DeveloperPatch};
use crate::database::repository::{developers, teams};
use crate::error::ApiError;
use crate::handlers::{parse_uuid, success, success_message, AppJson};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// `?includeArchived=true` widens list queries to archived rows.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    include_archived: Option<String>,
}

impl ListQuery {
    pub fn include_archived(&self) -> bool {
        self.include_archived.as_deref() == Some("true")
    }
}

pub async fn list_developers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let scope = policy::list_scope(&auth.actor())?;
    let developers = developers::list(&state.pool, scope, query.include_archived()).await?;
    Ok(success(developers))
}

pub async fn list_archived_developers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let scope = policy::list_scope(&auth.actor())?;
    let developers = developers::list_archived(&state.pool, scope).await?;
    Ok(success(developers))
}

pub async fn get_developer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let developer_id = parse_uuid(&id)?;

    let developer = developers::find_by_id(&state.pool, developer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Desenvolvedor não encontrado"))?;

    policy::can_read_scoped(&auth.actor(), developer.company_id)?;
    Ok(success(developer))
}

pub async fn create_developer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppJson(req): AppJson<CreateDeveloperRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("Nome é obrigatório"));
    }
    if req.role.is_empty() {
        return Err(ApiError::bad_request("Cargo é obrigatório"));
    }

    let actor = auth.actor();
    let company_id = policy::resolve_owned_company(&actor, req.company_id)?;

    if let Some(team_id) = req.team_id {
        check_team_assignment(&state, &actor, team_id, company_id).await?;
    }

    let developer = developers::create(&state.pool, &req, company_id).await?;
    Ok((StatusCode::CREATED, success(developer)))
}

pub async fn update_developer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<DeveloperPatch>,
) -> Result<Json<Value>, ApiError> {
    let developer_id = parse_uuid(&id)?;

    let developer = developers::find_by_id(&state.pool, developer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Desenvolvedor não encontrado"))?;

    let actor = auth.actor();
    policy::can_write_scoped(&actor, developer.company_id)?;

    if patch.is_empty() {
        return Err(ApiError::bad_request("Nenhum campo para atualizar"));
    }

    if let (Some(team_id), Some(company_id)) = (patch.team_id, developer.company_id) {
        check_team_assignment(&state, &actor, team_id, company_id).await?;
    }

    let updated = developers::update(&state.pool, developer_id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Desenvolvedor não encontrado"))?;

    Ok(success(updated))
}

pub async fn archive_developer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(req): AppJson<ArchiveDeveloperRequest>,
) -> Result<Json<Value>, ApiError> {
    let developer_id = parse_uuid(&id)?;

    let developer = developers::find_by_id(&state.pool, developer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Desenvolvedor não encontrado"))?;

    policy::can_write_scoped(&auth.actor(), developer.company_id)?;

    let updated = developers::set_archived(&state.pool, developer_id, req.archive)
        .await?
        .ok_or_else(|| ApiError::not_found("Desenvolvedor não encontrado"))?;

    let message = if req.archive {
        "Desenvolvedor arquivado com sucesso"
    } else {
        "Desenvolvedor restaurado com sucesso"
    };
    Ok(success_message(message, updated))
}

pub async fn delete_developer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let developer_id = parse_uuid(&id)?;

    let developer = developers::find_by_id(&state.pool, developer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Desenvolvedor não encontrado"))?;

    policy::can_write_scoped(&auth.actor(), developer.company_id)?;

    developers::delete_with_reports(&state.pool, developer_id).await?;

    Ok(success_message(
        "Desenvolvedor excluído com sucesso",
        json!({ "deletedDeveloper": developer }),
    ))
}

/// A developer may only be attached to a team that exists and, for
/// non-admin actors, lives in the developer's own company.
async fn check_team_assignment(
    state: &AppState,
    actor: &policy::Actor,
    team_id: Uuid,
    company_id: Uuid,
) -> Result<(), ApiError> {
    let team = teams::find_by_id(&state.pool, team_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("Time não encontrado"))?;

    if !actor.role.is_admin() && team.company_id != Some(company_id) {
        return Err(ApiError::bad_request("Time não pertence à sua empresa"));
    }
    Ok(())
}
