//! Dining Table Model

use serde::{Deserialize, Serialize};

use super::TableReservation;

/// Dining table entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: i64,
    pub restaurant_id: i64,
    pub seating_capacity: i32,
    /// Cached flag, false iff the table holds a reservation
    pub is_available: bool,
}

/// Create dining table payload
///
/// New tables always start available.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableCreate {
    pub restaurant_id: i64,
    pub seating_capacity: i32,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableUpdate {
    pub seating_capacity: i32,
    /// Must agree with the table's reservations when present
    pub is_available: Option<bool>,
}

/// Table with its reservations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableDetail {
    #[serde(flatten)]
    pub table: DiningTable,
    pub reservations: Vec<TableReservation>,
}
