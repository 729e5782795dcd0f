//! User Repository

use super::RepoResult;
use shared::models::{RegisterRequest, Role, User};
use sqlx::{Executor, Sqlite};

pub async fn find_by_id(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, username, email, first_name, last_name, role, password_hash, created_at FROM user WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Case-insensitive lookup
pub async fn find_by_username(
    conn: impl Executor<'_, Database = Sqlite>,
    username: &str,
) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, username, email, first_name, last_name, role, password_hash, created_at FROM user WHERE username = ? COLLATE NOCASE LIMIT 1",
    )
    .bind(username.trim())
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn create(
    conn: impl Executor<'_, Database = Sqlite>,
    data: &RegisterRequest,
    password_hash: &str,
    role: Role,
    created_at: i64,
) -> RepoResult<User> {
    let row = sqlx::query_as::<_, User>(
        "INSERT INTO user (username, email, first_name, last_name, role, password_hash, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id, username, email, first_name, last_name, role, password_hash, created_at",
    )
    .bind(data.username.trim())
    .bind(data.email.trim())
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(role)
    .bind(password_hash)
    .bind(created_at)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub async fn update_password(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    password_hash: &str,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE user SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}
