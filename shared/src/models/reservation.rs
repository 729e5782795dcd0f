//! Table Reservation Model

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Table reservation entity
///
/// `restaurant_name` and `username` are copied at creation (and on full
/// replace); later renames do not propagate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct TableReservation {
    pub id: i64,
    pub table_id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub username: String,
    pub reservation_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub party_size: i32,
    pub special_requests: Option<String>,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReservationCreate {
    pub table_id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub reservation_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub party_size: i32,
    pub special_requests: Option<String>,
}

/// Full replace payload (PUT)
pub type TableReservationUpdate = TableReservationCreate;
