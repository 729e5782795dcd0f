//! Menu Item Repository

use super::RepoResult;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::{Executor, Sqlite};

pub async fn find_all(conn: impl Executor<'_, Database = Sqlite>) -> RepoResult<Vec<MenuItem>> {
    let rows = sqlx::query_as::<_, MenuItem>(
        "SELECT id, restaurant_id, name, description, price FROM menu_item ORDER BY id",
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn find_by_restaurant(
    conn: impl Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<Vec<MenuItem>> {
    let rows = sqlx::query_as::<_, MenuItem>(
        "SELECT id, restaurant_id, name, description, price FROM menu_item WHERE restaurant_id = ? ORDER BY id",
    )
    .bind(restaurant_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<MenuItem>> {
    let row = sqlx::query_as::<_, MenuItem>(
        "SELECT id, restaurant_id, name, description, price FROM menu_item WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn create(
    conn: impl Executor<'_, Database = Sqlite>,
    data: &MenuItemCreate,
    price: f64,
) -> RepoResult<MenuItem> {
    let row = sqlx::query_as::<_, MenuItem>(
        "INSERT INTO menu_item (restaurant_id, name, description, price) VALUES (?, ?, ?, ?) RETURNING id, restaurant_id, name, description, price",
    )
    .bind(data.restaurant_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(price)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub async fn update(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    data: &MenuItemUpdate,
    price: f64,
) -> RepoResult<Option<MenuItem>> {
    let row = sqlx::query_as::<_, MenuItem>(
        "UPDATE menu_item SET name = ?1, description = ?2, price = ?3 WHERE id = ?4 RETURNING id, restaurant_id, name, description, price",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(price)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn delete(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu_item WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete_by_restaurant(
    conn: impl Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM menu_item WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

/// Whether any order line references the menu item
pub async fn is_referenced(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let in_use: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM order_item WHERE menu_item_id = ?)")
            .bind(id)
            .fetch_one(conn)
            .await?;
    Ok(in_use)
}
