//! Restaurant Repository

use super::RepoResult;
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use sqlx::{Executor, Sqlite};

pub async fn find_all(conn: impl Executor<'_, Database = Sqlite>) -> RepoResult<Vec<Restaurant>> {
    let rows = sqlx::query_as::<_, Restaurant>(
        "SELECT id, name, location, description, contact_info, average_rating FROM restaurant ORDER BY id",
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(
        "SELECT id, name, location, description, contact_info, average_rating FROM restaurant WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn create(
    conn: impl Executor<'_, Database = Sqlite>,
    data: &RestaurantCreate,
) -> RepoResult<Restaurant> {
    let row = sqlx::query_as::<_, Restaurant>(
        "INSERT INTO restaurant (name, location, description, contact_info, average_rating) VALUES (?, ?, ?, ?, 0) RETURNING id, name, location, description, contact_info, average_rating",
    )
    .bind(&data.name)
    .bind(&data.location)
    .bind(&data.description)
    .bind(&data.contact_info)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

/// Full replace of the editable columns; `average_rating` is left alone.
pub async fn update(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    data: &RestaurantUpdate,
) -> RepoResult<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(
        "UPDATE restaurant SET name = ?1, location = ?2, description = ?3, contact_info = ?4 WHERE id = ?5 RETURNING id, name, location, description, contact_info, average_rating",
    )
    .bind(&data.name)
    .bind(&data.location)
    .bind(&data.description)
    .bind(&data.contact_info)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn set_average_rating(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    rating: f64,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE restaurant SET average_rating = ? WHERE id = ?")
        .bind(rating)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM restaurant WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Whether any reservation or order still references the restaurant
pub async fn has_bookings(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let in_use: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM table_reservation WHERE restaurant_id = ?1) OR EXISTS (SELECT 1 FROM orders WHERE restaurant_id = ?1)",
    )
    .bind(id)
    .fetch_one(conn)
    .await?;
    Ok(in_use)
}
