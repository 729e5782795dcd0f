//! Waitlist Model

use serde::{Deserialize, Serialize};

/// Waitlist entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Waitlist {
    pub id: i64,
    pub restaurant_id: i64,
    pub table_id: i64,
    pub user_id: i64,
    /// Unix millis
    pub created_at: i64,
}

/// Create waitlist payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistCreate {
    pub restaurant_id: i64,
    pub table_id: i64,
    pub user_id: i64,
}
