pub mod auth;
pub mod companies;
pub mod developers;
pub mod init;
pub mod reports;
pub mod teams;
pub mod users;

use axum::extract::FromRequest;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;

/// Json extractor whose rejection is our 400 envelope instead of axum's
/// plain-text default.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Standard success envelope: `{"success": true, "data": ...}`.
pub(crate) fn success(data: impl Serialize) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

/// Success envelope for operations whose result is just a confirmation.
pub(crate) fn success_message(message: &str, data: impl Serialize) -> Json<Value> {
    Json(json!({ "success": true, "message": message, "data": data }))
}

/// Path ids arrive as raw strings so that a malformed uuid is a 400 in the
/// standard envelope, not a framework rejection.
pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("ID inválido"))
}

/// Minimal shape check; full deliverability is out of scope.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
