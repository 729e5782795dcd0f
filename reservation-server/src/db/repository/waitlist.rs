//! Waitlist Repository

use super::RepoResult;
use shared::models::{Waitlist, WaitlistCreate};
use sqlx::{Executor, Sqlite};

pub async fn find_all(conn: impl Executor<'_, Database = Sqlite>) -> RepoResult<Vec<Waitlist>> {
    let rows = sqlx::query_as::<_, Waitlist>(
        "SELECT id, restaurant_id, table_id, user_id, created_at FROM waitlist ORDER BY id",
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Waitlist>> {
    let row = sqlx::query_as::<_, Waitlist>(
        "SELECT id, restaurant_id, table_id, user_id, created_at FROM waitlist WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn find_by_user(
    conn: impl Executor<'_, Database = Sqlite>,
    user_id: i64,
) -> RepoResult<Vec<Waitlist>> {
    let rows = sqlx::query_as::<_, Waitlist>(
        "SELECT id, restaurant_id, table_id, user_id, created_at FROM waitlist WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn find_by_table(
    conn: impl Executor<'_, Database = Sqlite>,
    table_id: i64,
) -> RepoResult<Vec<Waitlist>> {
    let rows = sqlx::query_as::<_, Waitlist>(
        "SELECT id, restaurant_id, table_id, user_id, created_at FROM waitlist WHERE table_id = ? ORDER BY id",
    )
    .bind(table_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn create(
    conn: impl Executor<'_, Database = Sqlite>,
    data: &WaitlistCreate,
    created_at: i64,
) -> RepoResult<Waitlist> {
    let row = sqlx::query_as::<_, Waitlist>(
        "INSERT INTO waitlist (restaurant_id, table_id, user_id, created_at) VALUES (?, ?, ?, ?) RETURNING id, restaurant_id, table_id, user_id, created_at",
    )
    .bind(data.restaurant_id)
    .bind(data.table_id)
    .bind(data.user_id)
    .bind(created_at)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub async fn delete(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM waitlist WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete_by_user(
    conn: impl Executor<'_, Database = Sqlite>,
    user_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM waitlist WHERE user_id = ?")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_by_table(
    conn: impl Executor<'_, Database = Sqlite>,
    table_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM waitlist WHERE table_id = ?")
        .bind(table_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_by_restaurant(
    conn: impl Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM waitlist WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}
