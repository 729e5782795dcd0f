//! Review Model

use serde::{Deserialize, Serialize};

/// Review entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_id: i64,
    /// 1.0 ..= 5.0, fractional allowed
    pub rating: f64,
    pub comment: Option<String>,
    /// Unix millis, set by the server
    pub review_date: i64,
}

/// Review joined with author and restaurant names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetail {
    pub id: i64,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub user_id: i64,
    pub username: String,
    pub rating: f64,
    pub comment: Option<String>,
    pub review_date: i64,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreate {
    pub restaurant_id: i64,
    pub user_id: i64,
    pub rating: f64,
    pub comment: Option<String>,
}

/// Update review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    pub rating: f64,
    pub comment: Option<String>,
}
