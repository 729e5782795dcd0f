//! Average rating aggregation
//!
//! `restaurant.average_rating` is written only here, inside the same
//! transaction as the review write that changed it.

use sqlx::SqliteConnection;

use crate::db::repository::{restaurant, review};
use crate::utils::money;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Recompute the restaurant's mean rating (one decimal place, 0 without reviews)
pub async fn recompute(conn: &mut SqliteConnection, restaurant_id: i64) -> AppResult<f64> {
    let mean = review::average_rating(&mut *conn, restaurant_id).await?;
    let rating = money::average_rating(mean);

    if !restaurant::set_average_rating(&mut *conn, restaurant_id, rating).await? {
        return Err(AppError::entity_not_found(
            ErrorCode::RestaurantNotFound,
            restaurant_id,
        ));
    }

    tracing::debug!(restaurant_id, average_rating = rating, "Average rating recomputed");
    Ok(rating)
}
