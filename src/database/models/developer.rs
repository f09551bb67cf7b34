use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub id: Uuid,
    pub name: String,
    /// Job title ("Backend", "Tech Lead", ...), not an access role.
    pub role: String,
    pub latest_performance_score: Decimal,
    pub team_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeveloperRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub team_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub latest_performance_score: Option<Decimal>,
    pub team_id: Option<Uuid>,
}

impl DeveloperPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.latest_performance_score.is_none()
            && self.team_id.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct ArchiveDeveloperRequest {
    pub archive: bool,
}
