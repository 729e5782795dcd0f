//! Table Reservation Repository

use super::RepoResult;
use shared::models::{TableReservation, TableReservationCreate};
use sqlx::{Executor, Sqlite};

const SELECT: &str = "SELECT id, table_id, user_id, restaurant_id, restaurant_name, username, reservation_date, start_time, end_time, party_size, special_requests FROM table_reservation";

pub async fn find_all(
    conn: impl Executor<'_, Database = Sqlite>,
) -> RepoResult<Vec<TableReservation>> {
    let sql = format!("{SELECT} ORDER BY id");
    let rows = sqlx::query_as::<_, TableReservation>(&sql)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<TableReservation>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, TableReservation>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn find_by_user(
    conn: impl Executor<'_, Database = Sqlite>,
    user_id: i64,
) -> RepoResult<Vec<TableReservation>> {
    let sql = format!("{SELECT} WHERE user_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, TableReservation>(&sql)
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_by_table(
    conn: impl Executor<'_, Database = Sqlite>,
    table_id: i64,
) -> RepoResult<Vec<TableReservation>> {
    let sql = format!("{SELECT} WHERE table_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, TableReservation>(&sql)
        .bind(table_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_by_restaurant(
    conn: impl Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<Vec<TableReservation>> {
    let sql = format!("{SELECT} WHERE restaurant_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, TableReservation>(&sql)
        .bind(restaurant_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// Whether the table currently holds a reservation
pub async fn exists_for_table(
    conn: impl Executor<'_, Database = Sqlite>,
    table_id: i64,
) -> RepoResult<bool> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM table_reservation WHERE table_id = ?)")
            .bind(table_id)
            .fetch_one(conn)
            .await?;
    Ok(exists)
}

pub async fn insert(
    conn: impl Executor<'_, Database = Sqlite>,
    data: &TableReservationCreate,
    restaurant_name: &str,
    username: &str,
) -> RepoResult<TableReservation> {
    let row = sqlx::query_as::<_, TableReservation>(
        "INSERT INTO table_reservation (table_id, user_id, restaurant_id, restaurant_name, username, reservation_date, start_time, end_time, party_size, special_requests) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id, table_id, user_id, restaurant_id, restaurant_name, username, reservation_date, start_time, end_time, party_size, special_requests",
    )
    .bind(data.table_id)
    .bind(data.user_id)
    .bind(data.restaurant_id)
    .bind(restaurant_name)
    .bind(username)
    .bind(data.reservation_date)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(data.party_size)
    .bind(&data.special_requests)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

/// Full replace, including a fresh name snapshot
pub async fn replace(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    data: &TableReservationCreate,
    restaurant_name: &str,
    username: &str,
) -> RepoResult<Option<TableReservation>> {
    let row = sqlx::query_as::<_, TableReservation>(
        "UPDATE table_reservation SET table_id = ?1, user_id = ?2, restaurant_id = ?3, restaurant_name = ?4, username = ?5, reservation_date = ?6, start_time = ?7, end_time = ?8, party_size = ?9, special_requests = ?10 WHERE id = ?11 RETURNING id, table_id, user_id, restaurant_id, restaurant_name, username, reservation_date, start_time, end_time, party_size, special_requests",
    )
    .bind(data.table_id)
    .bind(data.user_id)
    .bind(data.restaurant_id)
    .bind(restaurant_name)
    .bind(username)
    .bind(data.reservation_date)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(data.party_size)
    .bind(&data.special_requests)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn delete(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM table_reservation WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}
