//! Route table and middleware composition.
//!
//! Per protected group the order is fixed: bearer auth → minimum-role gate
//! → must-change-password gate (domain groups only) → handler. Role gates
//! that differ per method are attached to the individual handlers.

use axum::handler::Handler;
use axum::http::{header, HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, companies, developers, init, reports, teams, users};
use crate::middleware::auth::auth_middleware;
use crate::middleware::password_gate::require_password_current;
use crate::middleware::role::{require_admin, require_manager};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes(state.clone()))
        .merge(session_routes(state.clone()))
        .merge(user_admin_routes(state.clone()))
        .merge(company_routes(state.clone()))
        .merge(domain_routes(state.clone()));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(cors_layer(&state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Performance Tracker API is running" }))
}

fn public_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/init/check", get(init::check))
        .route("/init/admin", post(init::create_admin))
        .with_state(state)
}

// Routes that must stay reachable while the must-change-password flag is
// set, so the account can actually resolve it.
fn session_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/profile", get(auth::profile))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/set-new-password", post(auth::set_new_password))
        .route("/auth/change-password", post(auth::change_password))
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn user_admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/create-user", post(users::create_user))
        .route("/auth/users", get(users::list_users))
        .route("/auth/users/:id", put(users::update_user).delete(users::delete_user))
        .layer(from_fn(require_manager))
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn company_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/companies",
            get(companies::list_companies.layer(from_fn(require_manager)))
                .post(companies::create_company.layer(from_fn(require_admin))),
        )
        .route(
            "/companies/:id",
            get(companies::get_company.layer(from_fn(require_admin)))
                .put(companies::update_company.layer(from_fn(require_admin)))
                .delete(companies::delete_company.layer(from_fn(require_admin))),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn domain_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/teams",
            get(teams::list_teams).post(teams::create_team.layer(from_fn(require_manager))),
        )
        .route(
            "/teams/:id",
            get(teams::get_team)
                .put(teams::update_team.layer(from_fn(require_manager)))
                .delete(teams::delete_team.layer(from_fn(require_admin))),
        )
        .route("/teams/:id/developers", get(teams::list_team_developers))
        .route(
            "/developers",
            get(developers::list_developers)
                .post(developers::create_developer.layer(from_fn(require_manager))),
        )
        .route("/developers/archived", get(developers::list_archived_developers))
        .route(
            "/developers/:id",
            get(developers::get_developer)
                .put(developers::update_developer.layer(from_fn(require_manager)))
                .delete(developers::delete_developer.layer(from_fn(require_manager))),
        )
        .route(
            "/developers/:id/archive",
            put(developers::archive_developer.layer(from_fn(require_manager))),
        )
        .route("/developers/:id/reports", get(reports::list_reports_by_developer))
        .route(
            "/performance-reports",
            get(reports::list_reports).post(reports::create_report.layer(from_fn(require_manager))),
        )
        .route("/performance-reports/months", get(reports::available_months))
        .route("/performance-reports/stats", get(reports::performance_stats))
        .route("/performance-reports/month/:month", get(reports::list_reports_by_month))
        .route("/performance-reports/:id", get(reports::get_report))
        .layer(from_fn(require_password_current))
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true);

    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(AllowOrigin::exact(value)),
        Err(_) => {
            tracing::warn!("invalid CORS_ORIGIN {origin:?}, allowing no cross-origin requests");
            layer
        }
    }
}
