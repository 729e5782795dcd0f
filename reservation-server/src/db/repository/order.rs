//! Order Repository
//!
//! Orders and their lines. Line reads join `menu_item` so callers see the
//! current name and unit price.

use super::RepoResult;
use shared::models::{Order, OrderCreate, OrderItem, OrderStatus};
use sqlx::{Executor, Sqlite};

const SELECT: &str = "SELECT id, user_id, restaurant_id, table_id, reservation_id, order_date, total_amount, order_status FROM orders";

const SELECT_ITEM: &str = "SELECT oi.id, oi.order_id, oi.menu_item_id, oi.quantity, mi.name AS menu_item_name, mi.price AS unit_price FROM order_item oi JOIN menu_item mi ON mi.id = oi.menu_item_id";

// ── Orders ──────────────────────────────────────────────────────────

pub async fn find_all(conn: impl Executor<'_, Database = Sqlite>) -> RepoResult<Vec<Order>> {
    let sql = format!("{SELECT} ORDER BY id");
    let rows = sqlx::query_as::<_, Order>(&sql).fetch_all(conn).await?;
    Ok(rows)
}

pub async fn find_by_id(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn find_by_table(
    conn: impl Executor<'_, Database = Sqlite>,
    table_id: i64,
) -> RepoResult<Vec<Order>> {
    let sql = format!("{SELECT} WHERE table_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(table_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_by_user(
    conn: impl Executor<'_, Database = Sqlite>,
    user_id: i64,
) -> RepoResult<Vec<Order>> {
    let sql = format!("{SELECT} WHERE user_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_by_reservation(
    conn: impl Executor<'_, Database = Sqlite>,
    reservation_id: i64,
) -> RepoResult<Vec<Order>> {
    let sql = format!("{SELECT} WHERE reservation_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(reservation_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// Orders owned by the user or attached to one of the user's reservations
pub async fn find_for_user_cascade(
    conn: impl Executor<'_, Database = Sqlite>,
    user_id: i64,
) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "{SELECT} WHERE user_id = ?1 OR reservation_id IN (SELECT id FROM table_reservation WHERE user_id = ?1) ORDER BY id"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// New orders start `pending` with a zero total
pub async fn create(
    conn: impl Executor<'_, Database = Sqlite>,
    data: &OrderCreate,
    order_date: i64,
) -> RepoResult<Order> {
    let row = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (user_id, restaurant_id, table_id, reservation_id, order_date, total_amount, order_status) VALUES (?, ?, ?, ?, ?, 0, 'pending') RETURNING id, user_id, restaurant_id, table_id, reservation_id, order_date, total_amount, order_status",
    )
    .bind(data.user_id)
    .bind(data.restaurant_id)
    .bind(data.table_id)
    .bind(data.reservation_id)
    .bind(order_date)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub async fn set_status(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    status: OrderStatus,
) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(
        "UPDATE orders SET order_status = ? WHERE id = ? RETURNING id, user_id, restaurant_id, table_id, reservation_id, order_date, total_amount, order_status",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn set_total(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    total_amount: f64,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE orders SET total_amount = ? WHERE id = ?")
        .bind(total_amount)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Re-point the reservation's orders at another table
pub async fn move_reservation_orders(
    conn: impl Executor<'_, Database = Sqlite>,
    reservation_id: i64,
    table_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE orders SET table_id = ? WHERE reservation_id = ?")
        .bind(table_id)
        .bind(reservation_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Order items ─────────────────────────────────────────────────────

pub async fn find_items(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: i64,
) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{SELECT_ITEM} WHERE oi.order_id = ? ORDER BY oi.id");
    let rows = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_item(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: i64,
    item_id: i64,
) -> RepoResult<Option<OrderItem>> {
    let sql = format!("{SELECT_ITEM} WHERE oi.order_id = ? AND oi.id = ?");
    let row = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .bind(item_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn insert_item(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: i64,
    menu_item_id: i64,
    quantity: i32,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO order_item (order_id, menu_item_id, quantity) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(order_id)
    .bind(menu_item_id)
    .bind(quantity)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn update_item_quantity(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: i64,
    item_id: i64,
    quantity: i32,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE order_item SET quantity = ? WHERE id = ? AND order_id = ?")
        .bind(quantity)
        .bind(item_id)
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete_item(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: i64,
    item_id: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM order_item WHERE id = ? AND order_id = ?")
        .bind(item_id)
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete_items(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

/// `(quantity, current unit price)` for every line of the order
pub async fn price_lines(
    conn: impl Executor<'_, Database = Sqlite>,
    order_id: i64,
) -> RepoResult<Vec<(i32, f64)>> {
    let rows: Vec<(i32, f64)> = sqlx::query_as(
        "SELECT oi.quantity, mi.price FROM order_item oi JOIN menu_item mi ON mi.id = oi.menu_item_id WHERE oi.order_id = ? ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
