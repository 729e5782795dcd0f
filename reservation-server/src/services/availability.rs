//! Table availability
//!
//! `dining_table.is_available` is a cached copy of "no reservation holds this
//! table". Only the functions here write it; they run on the caller's
//! transaction connection.

use sqlx::SqliteConnection;

use crate::db::repository::{dining_table, reservation};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Compare-and-swap the table from available to reserved.
///
/// Must be the first write of the reservation transaction so concurrent
/// bookers serialise on SQLite's write lock.
pub async fn try_reserve(conn: &mut SqliteConnection, table_id: i64) -> AppResult<()> {
    if dining_table::try_reserve(&mut *conn, table_id).await? {
        return Ok(());
    }

    match dining_table::find_by_id(&mut *conn, table_id).await? {
        None => Err(AppError::entity_not_found(ErrorCode::TableNotFound, table_id)),
        Some(_) => {
            tracing::info!(table_id, "Table already reserved");
            Err(AppError::new(ErrorCode::TableAlreadyReserved).with_detail("table_id", table_id))
        }
    }
}

/// Mark the table available again after its reservation is gone
pub async fn release(conn: &mut SqliteConnection, table_id: i64) -> AppResult<()> {
    set_available(conn, table_id, true).await
}

pub async fn set_available(
    conn: &mut SqliteConnection,
    table_id: i64,
    is_available: bool,
) -> AppResult<()> {
    if !dining_table::set_available(&mut *conn, table_id, is_available).await? {
        return Err(AppError::entity_not_found(ErrorCode::TableNotFound, table_id));
    }
    Ok(())
}

/// Derived state: does a reservation currently hold the table
pub async fn is_occupied(conn: &mut SqliteConnection, table_id: i64) -> AppResult<bool> {
    Ok(reservation::exists_for_table(&mut *conn, table_id).await?)
}

/// Rewrite the cached flag from the derived state
pub async fn sync(conn: &mut SqliteConnection, table_id: i64) -> AppResult<bool> {
    let available = !is_occupied(&mut *conn, table_id).await?;
    set_available(conn, table_id, available).await?;
    Ok(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::*;

    #[tokio::test]
    async fn test_try_reserve_is_compare_and_swap() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let table = seed_table(&pool, r.id, 4).await;

        let mut conn = pool.acquire().await.unwrap();
        try_reserve(&mut conn, table.id).await.unwrap();

        let err = try_reserve(&mut conn, table.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableAlreadyReserved);

        let err = try_reserve(&mut conn, 999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);
    }

    #[tokio::test]
    async fn test_sync_restores_derived_state() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let table = seed_table(&pool, r.id, 4).await;

        let mut conn = pool.acquire().await.unwrap();
        set_available(&mut conn, table.id, false).await.unwrap();
        assert!(!is_occupied(&mut conn, table.id).await.unwrap());

        assert!(sync(&mut conn, table.id).await.unwrap());
        let stored = dining_table::find_by_id(&pool, table.id).await.unwrap().unwrap();
        assert!(stored.is_available);
    }
}
