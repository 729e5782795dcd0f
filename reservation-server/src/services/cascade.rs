//! 用户级联删除
//!
//! 先收集所有受影响的 id，再在一个事务中按外键顺序删除：
//! order items → orders → reservations → 桌台状态同步 → reviews (重算评分)
//! → waitlists → user。任意一步失败整体回滚，错误中带上失败的步骤名。

use std::collections::BTreeSet;

use sqlx::SqlitePool;

use super::{availability, rating, require};
use crate::db::begin_write;
use crate::db::repository::{order, reservation, review, user, waitlist};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Counts reported after a successful cascade
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CascadeSummary {
    pub orders: usize,
    pub reservations: usize,
    pub tables_synced: usize,
    pub reviews: u64,
    pub waitlists: u64,
}

/// Map a failure to `CascadeFailed` tagged with the step name
fn step<E: std::fmt::Display>(name: &'static str) -> impl Fn(E) -> AppError {
    move |e| AppError::cascade_failed(name, e.to_string())
}

/// Delete a user together with everything that references it
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> AppResult<CascadeSummary> {
    let mut tx = begin_write(pool).await.map_err(step("begin"))?;

    require(
        user::find_by_id(&mut *tx, user_id)
            .await
            .map_err(step("collect"))?,
        ErrorCode::UserNotFound,
        user_id,
    )?;

    // ── Collect ─────────────────────────────────────────────────────
    let reservations = reservation::find_by_user(&mut *tx, user_id)
        .await
        .map_err(step("collect"))?;
    let orders = order::find_for_user_cascade(&mut *tx, user_id)
        .await
        .map_err(step("collect"))?;
    let restaurants = review::restaurant_ids_by_user(&mut *tx, user_id)
        .await
        .map_err(step("collect"))?;

    let tables: BTreeSet<i64> = reservations
        .iter()
        .map(|r| r.table_id)
        .chain(orders.iter().map(|o| o.table_id))
        .collect();

    // ── Delete in dependency order ──────────────────────────────────
    for o in &orders {
        order::delete_items(&mut *tx, o.id)
            .await
            .map_err(step("order_items"))?;
    }
    for o in &orders {
        order::delete(&mut *tx, o.id)
            .await
            .map_err(step("orders"))?;
    }
    for r in &reservations {
        reservation::delete(&mut *tx, r.id)
            .await
            .map_err(step("reservations"))?;
    }
    for table_id in &tables {
        availability::sync(&mut tx, *table_id)
            .await
            .map_err(step("tables"))?;
    }

    let reviews = review::delete_by_user(&mut *tx, user_id)
        .await
        .map_err(step("reviews"))?;
    for restaurant_id in &restaurants {
        rating::recompute(&mut tx, *restaurant_id)
            .await
            .map_err(step("ratings"))?;
    }

    let waitlists = waitlist::delete_by_user(&mut *tx, user_id)
        .await
        .map_err(step("waitlists"))?;
    user::delete(&mut *tx, user_id)
        .await
        .map_err(step("user"))?;

    tx.commit()
        .await
        .map_err(step("commit"))?;

    let summary = CascadeSummary {
        orders: orders.len(),
        reservations: reservations.len(),
        tables_synced: tables.len(),
        reviews,
        waitlists,
    };
    tracing::info!(
        user_id,
        orders = summary.orders,
        reservations = summary.reservations,
        tables = summary.tables_synced,
        reviews = summary.reviews,
        waitlists = summary.waitlists,
        "User deleted with dependents"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::dining_table;
    use crate::services::test_support::*;
    use crate::services::{OrderService, ReservationService, ReviewService};
    use shared::models::{OrderCreate, OrderItemCreate, ReviewCreate, WaitlistCreate};

    #[tokio::test]
    async fn test_delete_user_frees_tables_and_removes_orders() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let t1 = seed_table(&pool, r.id, 4).await;
        let t2 = seed_table(&pool, r.id, 4).await;
        let ana = seed_user(&pool, "ana").await;
        let bob = seed_user(&pool, "bob").await;
        let pizza = seed_menu_item(&pool, r.id, 10.0).await;

        let reservations = ReservationService::new(pool.clone());
        let orders = OrderService::new(pool.clone());
        for table in [&t1, &t2] {
            let b = reservations.create(booking(table, ana.id, 2)).await.unwrap();
            let o = orders
                .create(OrderCreate {
                    user_id: ana.id,
                    restaurant_id: r.id,
                    table_id: table.id,
                    reservation_id: b.id,
                })
                .await
                .unwrap();
            orders
                .add_item(o.id, OrderItemCreate { menu_item_id: pizza.id, quantity: 1 })
                .await
                .unwrap();
        }

        let reviews = ReviewService::new(pool.clone());
        for (uid, rating) in [(ana.id, 1.0), (bob.id, 5.0)] {
            reviews
                .create(ReviewCreate {
                    restaurant_id: r.id,
                    user_id: uid,
                    rating,
                    comment: None,
                })
                .await
                .unwrap();
        }
        waitlist::create(
            &pool,
            &WaitlistCreate {
                restaurant_id: r.id,
                table_id: t1.id,
                user_id: ana.id,
            },
            0,
        )
        .await
        .unwrap();

        let summary = delete_user(&pool, ana.id).await.unwrap();
        assert_eq!(summary.orders, 2);
        assert_eq!(summary.reservations, 2);
        assert_eq!(summary.tables_synced, 2);
        assert_eq!(summary.reviews, 1);
        assert_eq!(summary.waitlists, 1);

        for table in [&t1, &t2] {
            let stored = dining_table::find_by_id(&pool, table.id).await.unwrap().unwrap();
            assert!(stored.is_available);
        }
        assert!(orders.list_all().await.unwrap().is_empty());
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(items, 0);
        assert!(user::find_by_id(&pool, ana.id).await.unwrap().is_none());

        // Only bob's review remains
        let stored = crate::db::repository::restaurant::find_by_id(&pool, r.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.average_rating, 5.0);
    }

    #[tokio::test]
    async fn test_other_users_reservation_keeps_table_reserved() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let table = seed_table(&pool, r.id, 4).await;
        let ana = seed_user(&pool, "ana").await;
        let bob = seed_user(&pool, "bob").await;

        // Ana ordered on Bob's reservation
        let b = ReservationService::new(pool.clone())
            .create(booking(&table, bob.id, 2))
            .await
            .unwrap();
        OrderService::new(pool.clone())
            .create(OrderCreate {
                user_id: ana.id,
                restaurant_id: r.id,
                table_id: table.id,
                reservation_id: b.id,
            })
            .await
            .unwrap();

        delete_user(&pool, ana.id).await.unwrap();

        let stored = dining_table::find_by_id(&pool, table.id).await.unwrap().unwrap();
        assert!(!stored.is_available);
        assert!(reservation::find_by_id(&pool, b.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let (_dir, pool) = test_pool().await;
        let err = delete_user(&pool, 404).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[test]
    fn test_step_failures_carry_step_name() {
        let err = step("orders")(sqlx::Error::RowNotFound);
        assert_eq!(err.code, ErrorCode::CascadeFailed);
        assert_eq!(err.details.unwrap()["step"], "orders");

        let err = step("collect")(crate::db::repository::RepoError::from(sqlx::Error::PoolTimedOut));
        assert_eq!(err.code, ErrorCode::CascadeFailed);
        assert_eq!(err.details.unwrap()["step"], "collect");
    }
}
