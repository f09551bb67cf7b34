use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Monthly review for one developer. At most one row per
/// (developer, month); the month key uses the `YYYY-MM` form.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub id: Uuid,
    pub developer_id: Uuid,
    pub month: String,
    pub question_scores: Value,
    pub category_scores: Value,
    pub weighted_average_score: Decimal,
    pub highlights: String,
    pub points_to_develop: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePerformanceReportRequest {
    pub developer_id: Uuid,
    #[serde(default)]
    pub month: String,
    pub question_scores: Value,
    pub category_scores: Value,
    pub weighted_average_score: Decimal,
    #[serde(default)]
    pub highlights: String,
    #[serde(default)]
    pub points_to_develop: String,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub total_reports: i64,
    pub average_score: Decimal,
    pub highest_score: Decimal,
    pub lowest_score: Decimal,
}

/// Month keys are plain strings in the store; reject anything that is not
/// `YYYY-MM` with a month between 01 and 12 before it reaches a query.
pub fn is_valid_month(month: &str) -> bool {
    let bytes = month.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return false;
    }
    if !bytes[..4].iter().all(u8::is_ascii_digit) || !bytes[5..].iter().all(u8::is_ascii_digit) {
        return false;
    }
    matches!(month[5..].parse::<u8>(), Ok(1..=12))
}

/// Score maps are opaque beyond their shape: a JSON object whose values are
/// all numbers.
pub fn is_score_map(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.values().all(Value::is_number),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn month_format_validation() {
        assert!(is_valid_month("2025-01"));
        assert!(is_valid_month("1999-12"));
        assert!(!is_valid_month("2025-13"));
        assert!(!is_valid_month("2025-00"));
        assert!(!is_valid_month("2025-1"));
        assert!(!is_valid_month("25-01"));
        assert!(!is_valid_month("2025/01"));
        assert!(!is_valid_month(""));
        assert!(!is_valid_month("janeiro"));
    }

    #[test]
    fn score_map_shape() {
        assert!(is_score_map(&json!({})));
        assert!(is_score_map(&json!({"q1": 7, "q2": 8.5})));
        assert!(!is_score_map(&json!({"q1": "sete"})));
        assert!(!is_score_map(&json!([1, 2, 3])));
        assert!(!is_score_map(&json!(null)));
    }
}
