//! Monthly performance reports: listings, month index, aggregate stats and
//! creation with the (developer, month) uniqueness rule.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::report::{is_score_map, is_valid_month};
use crate::database::models::CreatePerformanceReportRequest;
use crate::database::repository::{developers, reports};
use crate::error::ApiError;
use crate::handlers::{parse_uuid, success, AppJson};
use crate::state::AppState;

pub async fn list_reports(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let reports = reports::list(&state.pool).await?;
    Ok(success(reports))
}

pub async fn list_reports_by_developer(
    State(state): State<AppState>,
    Path(developer_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let developer_id =
        parse_uuid(&developer_id).map_err(|_| ApiError::bad_request("ID do desenvolvedor inválido"))?;
    let reports = reports::list_by_developer(&state.pool, developer_id).await?;
    Ok(success(reports))
}

pub async fn list_reports_by_month(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let reports = reports::list_by_month(&state.pool, &month).await?;
    Ok(success(reports))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let report_id = parse_uuid(&id)?;
    let report = reports::find_by_id(&state.pool, report_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Relatório não encontrado"))?;
    Ok(success(report))
}

pub async fn available_months(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let months = reports::months(&state.pool).await?;
    Ok(success(months))
}

pub async fn performance_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stats = reports::stats(&state.pool).await?;
    Ok(success(stats))
}

pub async fn create_report(
    State(state): State<AppState>,
    AppJson(mut req): AppJson<CreatePerformanceReportRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if req.developer_id == Uuid::nil() {
        return Err(ApiError::bad_request("ID do desenvolvedor é obrigatório"));
    }
    if req.month.is_empty() {
        return Err(ApiError::bad_request("Mês é obrigatório"));
    }
    if !is_valid_month(&req.month) {
        return Err(ApiError::bad_request("Mês deve estar no formato YYYY-MM"));
    }
    if req.weighted_average_score < Decimal::ZERO || req.weighted_average_score > Decimal::from(10) {
        return Err(ApiError::bad_request("Pontuação deve estar entre 0 e 10"));
    }
    if !is_score_map(&req.question_scores) || !is_score_map(&req.category_scores) {
        return Err(ApiError::bad_request(
            "questionScores e categoryScores devem ser objetos de números",
        ));
    }

    if !developers::exists(&state.pool, req.developer_id).await? {
        return Err(ApiError::bad_request("Desenvolvedor não encontrado"));
    }

    if reports::exists_for_month(&state.pool, req.developer_id, &req.month).await? {
        return Err(ApiError::conflict(
            "Já existe um relatório para este desenvolvedor neste mês",
        ));
    }

    // stored with two fractional digits, same precision as the column
    req.weighted_average_score = req.weighted_average_score.round_dp(2);

    let report = reports::create(&state.pool, &req).await?;

    // Best-effort cache refresh: the report is the authoritative record, so
    // a failure here is logged and does not undo the creation.
    if let Err(err) =
        developers::update_latest_score(&state.pool, req.developer_id, req.weighted_average_score)
            .await
    {
        tracing::error!(
            "failed to refresh latest score for developer {}: {}",
            req.developer_id,
            err
        );
    }

    Ok((StatusCode::CREATED, success(report)))
}
