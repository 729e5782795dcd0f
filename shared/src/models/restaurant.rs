//! Restaurant Model

use serde::{Deserialize, Serialize};

use super::DiningTable;

/// Restaurant entity
///
/// `average_rating` is derived from reviews and never accepted from clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub contact_info: Option<String>,
    /// Mean review rating, one fractional digit, 0 without reviews
    pub average_rating: f64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCreate {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub contact_info: Option<String>,
}

/// Full replace payload (PUT)
pub type RestaurantUpdate = RestaurantCreate;

/// Restaurant with its tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub tables: Vec<DiningTable>,
}
