//! Dining Table Repository

use super::RepoResult;
use shared::models::{DiningTable, DiningTableCreate};
use sqlx::{Executor, Sqlite};

pub async fn find_all(conn: impl Executor<'_, Database = Sqlite>) -> RepoResult<Vec<DiningTable>> {
    let rows = sqlx::query_as::<_, DiningTable>(
        "SELECT id, restaurant_id, seating_capacity, is_available FROM dining_table ORDER BY id",
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn find_by_restaurant(
    conn: impl Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<Vec<DiningTable>> {
    let rows = sqlx::query_as::<_, DiningTable>(
        "SELECT id, restaurant_id, seating_capacity, is_available FROM dining_table WHERE restaurant_id = ? ORDER BY id",
    )
    .bind(restaurant_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let row = sqlx::query_as::<_, DiningTable>(
        "SELECT id, restaurant_id, seating_capacity, is_available FROM dining_table WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// New tables start available
pub async fn create(
    conn: impl Executor<'_, Database = Sqlite>,
    data: &DiningTableCreate,
) -> RepoResult<DiningTable> {
    let row = sqlx::query_as::<_, DiningTable>(
        "INSERT INTO dining_table (restaurant_id, seating_capacity, is_available) VALUES (?, ?, 1) RETURNING id, restaurant_id, seating_capacity, is_available",
    )
    .bind(data.restaurant_id)
    .bind(data.seating_capacity)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub async fn update_capacity(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    seating_capacity: i32,
) -> RepoResult<Option<DiningTable>> {
    let row = sqlx::query_as::<_, DiningTable>(
        "UPDATE dining_table SET seating_capacity = ? WHERE id = ? RETURNING id, restaurant_id, seating_capacity, is_available",
    )
    .bind(seating_capacity)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Compare-and-swap `available -> unavailable`.
///
/// Returns false when the table is missing or already unavailable.
pub async fn try_reserve(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE dining_table SET is_available = 0 WHERE id = ? AND is_available = 1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() == 1)
}

pub async fn set_available(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    is_available: bool,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE dining_table SET is_available = ? WHERE id = ?")
        .bind(is_available)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete_by_restaurant(
    conn: impl Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM dining_table WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

/// Whether any reservation or order still references the table
pub async fn is_referenced(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let in_use: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM table_reservation WHERE table_id = ?1) OR EXISTS (SELECT 1 FROM orders WHERE table_id = ?1)",
    )
    .bind(id)
    .fetch_one(conn)
    .await?;
    Ok(in_use)
}
