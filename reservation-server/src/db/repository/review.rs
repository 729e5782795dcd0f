//! Review Repository

use super::RepoResult;
use shared::models::{Review, ReviewCreate, ReviewDetail};
use sqlx::{Executor, Sqlite};

const SELECT_DETAIL: &str = "SELECT rv.id, rv.restaurant_id, r.name AS restaurant_name, rv.user_id, u.username, rv.rating, rv.comment, rv.review_date FROM review rv JOIN restaurant r ON r.id = rv.restaurant_id JOIN user u ON u.id = rv.user_id";

pub async fn find_all(conn: impl Executor<'_, Database = Sqlite>) -> RepoResult<Vec<ReviewDetail>> {
    let sql = format!("{SELECT_DETAIL} ORDER BY rv.id");
    let rows = sqlx::query_as::<_, ReviewDetail>(&sql).fetch_all(conn).await?;
    Ok(rows)
}

pub async fn find_detail(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<ReviewDetail>> {
    let sql = format!("{SELECT_DETAIL} WHERE rv.id = ?");
    let row = sqlx::query_as::<_, ReviewDetail>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn find_by_restaurant(
    conn: impl Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<Vec<ReviewDetail>> {
    let sql = format!("{SELECT_DETAIL} WHERE rv.restaurant_id = ? ORDER BY rv.id");
    let rows = sqlx::query_as::<_, ReviewDetail>(&sql)
        .bind(restaurant_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Review>> {
    let row = sqlx::query_as::<_, Review>(
        "SELECT id, restaurant_id, user_id, rating, comment, review_date FROM review WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn create(
    conn: impl Executor<'_, Database = Sqlite>,
    data: &ReviewCreate,
    review_date: i64,
) -> RepoResult<Review> {
    let row = sqlx::query_as::<_, Review>(
        "INSERT INTO review (restaurant_id, user_id, rating, comment, review_date) VALUES (?, ?, ?, ?, ?) RETURNING id, restaurant_id, user_id, rating, comment, review_date",
    )
    .bind(data.restaurant_id)
    .bind(data.user_id)
    .bind(data.rating)
    .bind(&data.comment)
    .bind(review_date)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub async fn update(
    conn: impl Executor<'_, Database = Sqlite>,
    id: i64,
    rating: f64,
    comment: &Option<String>,
) -> RepoResult<Option<Review>> {
    let row = sqlx::query_as::<_, Review>(
        "UPDATE review SET rating = ?, comment = ? WHERE id = ? RETURNING id, restaurant_id, user_id, rating, comment, review_date",
    )
    .bind(rating)
    .bind(comment)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn delete(conn: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM review WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Mean rating, `None` when the restaurant has no reviews
pub async fn average_rating(
    conn: impl Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<Option<f64>> {
    let avg: Option<f64> = sqlx::query_scalar("SELECT AVG(rating) FROM review WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .fetch_one(conn)
        .await?;
    Ok(avg)
}

/// Distinct restaurants the user has reviewed
pub async fn restaurant_ids_by_user(
    conn: impl Executor<'_, Database = Sqlite>,
    user_id: i64,
) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT DISTINCT restaurant_id FROM review WHERE user_id = ? ORDER BY restaurant_id",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(ids)
}

pub async fn delete_by_user(
    conn: impl Executor<'_, Database = Sqlite>,
    user_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM review WHERE user_id = ?")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_by_restaurant(
    conn: impl Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM review WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}
