//! Reservation lifecycle
//!
//! Create, replace and cancel reservations while keeping the table's
//! availability flag and the reservation's orders consistent.

use chrono::{Local, NaiveDate};
use shared::models::{DiningTable, Restaurant, TableReservation, TableReservationCreate, User};
use sqlx::{SqliteConnection, SqlitePool};

use super::{availability, require};
use crate::db::begin_write;
use crate::db::repository::{RepoError, dining_table, order, reservation, restaurant, user};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Reservation service
#[derive(Clone, Debug)]
pub struct ReservationService {
    pool: SqlitePool,
}

/// Rows a reservation body points at, loaded before any write
struct BookingContext {
    restaurant: Restaurant,
    user: User,
}

impl ReservationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<TableReservation>> {
        Ok(reservation::find_all(&self.pool).await?)
    }

    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<TableReservation>> {
        Ok(reservation::find_by_user(&self.pool, user_id).await?)
    }

    pub async fn list_by_table(&self, table_id: i64) -> AppResult<Vec<TableReservation>> {
        Ok(reservation::find_by_table(&self.pool, table_id).await?)
    }

    pub async fn list_by_restaurant(&self, restaurant_id: i64) -> AppResult<Vec<TableReservation>> {
        Ok(reservation::find_by_restaurant(&self.pool, restaurant_id).await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<TableReservation> {
        require(
            reservation::find_by_id(&self.pool, id).await?,
            ErrorCode::ReservationNotFound,
            id,
        )
    }

    /// Book a table
    ///
    /// The availability CAS is the transaction's first write; losing the race
    /// yields `TableAlreadyReserved` with nothing persisted.
    pub async fn create(&self, data: TableReservationCreate) -> AppResult<TableReservation> {
        validate_booking(&data, Local::now().date_naive())?;

        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        let ctx = load_context(&mut conn, &data).await?;
        drop(conn);

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        availability::try_reserve(&mut tx, data.table_id).await?;

        let created = reservation::insert(&mut *tx, &data, &ctx.restaurant.name, &ctx.user.username)
            .await
            .map_err(|e| map_double_booking(e, data.table_id))?;

        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            reservation_id = created.id,
            table_id = created.table_id,
            user_id = created.user_id,
            date = %created.reservation_date,
            "Reservation created"
        );
        Ok(created)
    }

    /// Full replace of a reservation
    ///
    /// Moving to another table reserves the new one, frees the old one and
    /// re-points the reservation's orders.
    pub async fn update(&self, id: i64, data: TableReservationCreate) -> AppResult<TableReservation> {
        validate_booking(&data, Local::now().date_naive())?;

        let existing = self.get(id).await?;
        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        let ctx = load_context(&mut conn, &data).await?;

        if existing.restaurant_id != data.restaurant_id
            && !order::find_by_reservation(&mut *conn, id).await?.is_empty()
        {
            return Err(AppError::with_message(
                ErrorCode::OrderReservationMismatch,
                "Cannot move a reservation with orders to another restaurant",
            )
            .with_detail("reservation_id", id));
        }
        drop(conn);

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        let table_changed = existing.table_id != data.table_id;
        if table_changed {
            availability::try_reserve(&mut tx, data.table_id).await?;
            availability::release(&mut tx, existing.table_id).await?;
            order::move_reservation_orders(&mut *tx, id, data.table_id).await?;
        }

        let updated = reservation::replace(&mut *tx, id, &data, &ctx.restaurant.name, &ctx.user.username)
            .await
            .map_err(|e| map_double_booking(e, data.table_id))?;
        let updated = require(updated, ErrorCode::ReservationNotFound, id)?;

        tx.commit().await.map_err(RepoError::from)?;

        if table_changed {
            tracing::info!(
                reservation_id = id,
                from_table = existing.table_id,
                to_table = data.table_id,
                "Reservation moved to another table"
            );
        } else {
            tracing::info!(reservation_id = id, "Reservation updated");
        }
        Ok(updated)
    }

    /// Cancel a reservation: items, orders, reservation, then free the table
    pub async fn cancel(&self, id: i64) -> AppResult<()> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;

        let existing = require(
            reservation::find_by_id(&mut *tx, id).await?,
            ErrorCode::ReservationNotFound,
            id,
        )?;

        let orders = order::find_by_reservation(&mut *tx, id).await?;
        for o in &orders {
            order::delete_items(&mut *tx, o.id).await?;
            order::delete(&mut *tx, o.id).await?;
        }
        reservation::delete(&mut *tx, id).await?;
        availability::release(&mut tx, existing.table_id).await?;

        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            reservation_id = id,
            table_id = existing.table_id,
            orders_deleted = orders.len(),
            "Reservation cancelled"
        );
        Ok(())
    }
}

/// Field checks that need no database access
fn validate_booking(data: &TableReservationCreate, today: NaiveDate) -> AppResult<()> {
    if data.start_time >= data.end_time {
        return Err(AppError::with_message(
            ErrorCode::InvalidTimeRange,
            format!(
                "Start time {} must be before end time {}",
                data.start_time, data.end_time
            ),
        ));
    }
    if data.party_size < 1 {
        return Err(AppError::with_message(
            ErrorCode::InvalidPartySize,
            format!("Party size must be at least 1, got {}", data.party_size),
        ));
    }
    if data.reservation_date < today {
        return Err(AppError::with_message(
            ErrorCode::ReservationInPast,
            format!("Reservation date {} is in the past", data.reservation_date),
        ));
    }
    validate_optional_text(&data.special_requests, "specialRequests", MAX_NOTE_LEN)?;
    Ok(())
}

/// Load and cross-check table, restaurant and user
async fn load_context(
    conn: &mut SqliteConnection,
    data: &TableReservationCreate,
) -> AppResult<BookingContext> {
    let table: DiningTable = require(
        dining_table::find_by_id(&mut *conn, data.table_id).await?,
        ErrorCode::TableNotFound,
        data.table_id,
    )?;
    let restaurant = require(
        restaurant::find_by_id(&mut *conn, data.restaurant_id).await?,
        ErrorCode::RestaurantNotFound,
        data.restaurant_id,
    )?;
    let user = require(
        user::find_by_id(&mut *conn, data.user_id).await?,
        ErrorCode::UserNotFound,
        data.user_id,
    )?;

    if table.restaurant_id != restaurant.id {
        return Err(AppError::new(ErrorCode::TableRestaurantMismatch)
            .with_detail("table_id", table.id)
            .with_detail("restaurant_id", restaurant.id));
    }
    if data.party_size > table.seating_capacity {
        return Err(AppError::with_message(
            ErrorCode::PartySizeExceedsCapacity,
            format!(
                "Party of {} exceeds table capacity {}",
                data.party_size, table.seating_capacity
            ),
        )
        .with_detail("seating_capacity", table.seating_capacity));
    }

    Ok(BookingContext { restaurant, user })
}

/// The unique index on `table_reservation.table_id` is the storage-level backstop
fn map_double_booking(err: RepoError, table_id: i64) -> AppError {
    match err {
        RepoError::Duplicate(_) => {
            AppError::new(ErrorCode::TableAlreadyReserved).with_detail("table_id", table_id)
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::*;
    use chrono::{Duration, NaiveTime};
    use shared::models::OrderCreate;

    async fn table_available(pool: &SqlitePool, table_id: i64) -> bool {
        dining_table::find_by_id(pool, table_id)
            .await
            .unwrap()
            .unwrap()
            .is_available
    }

    #[test]
    fn test_validate_booking_rules() {
        let today = Local::now().date_naive();
        let table = DiningTable {
            id: 1,
            restaurant_id: 1,
            seating_capacity: 4,
            is_available: true,
        };

        let mut data = booking(&table, 1, 2);
        assert!(validate_booking(&data, today).is_ok());

        data.end_time = data.start_time;
        assert_eq!(
            validate_booking(&data, today).unwrap_err().code,
            ErrorCode::InvalidTimeRange
        );

        let mut data = booking(&table, 1, 0);
        assert_eq!(
            validate_booking(&data, today).unwrap_err().code,
            ErrorCode::InvalidPartySize
        );

        data.party_size = 2;
        data.reservation_date = today - Duration::days(1);
        assert_eq!(
            validate_booking(&data, today).unwrap_err().code,
            ErrorCode::ReservationInPast
        );

        // Today is still bookable
        data.reservation_date = today;
        assert!(validate_booking(&data, today).is_ok());
    }

    #[tokio::test]
    async fn test_create_marks_table_and_snapshots_names() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let table = seed_table(&pool, r.id, 4).await;
        let u = seed_user(&pool, "ana").await;
        let svc = ReservationService::new(pool.clone());

        let created = svc.create(booking(&table, u.id, 4)).await.unwrap();
        assert_eq!(created.restaurant_name, "Trattoria");
        assert_eq!(created.username, "ana");
        assert!(!table_available(&pool, table.id).await);
    }

    #[tokio::test]
    async fn test_double_booking_conflicts_without_side_effects() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let table = seed_table(&pool, r.id, 4).await;
        let ana = seed_user(&pool, "ana").await;
        let bob = seed_user(&pool, "bob").await;
        let svc = ReservationService::new(pool.clone());

        let first = svc.create(booking(&table, ana.id, 2)).await.unwrap();
        let err = svc.create(booking(&table, bob.id, 2)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableAlreadyReserved);

        let rows = svc.list_by_table(table.id).await.unwrap();
        assert_eq!(rows, vec![first]);
        assert!(!table_available(&pool, table.id).await);
    }

    #[tokio::test]
    async fn test_capacity_boundary() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let t1 = seed_table(&pool, r.id, 4).await;
        let t2 = seed_table(&pool, r.id, 4).await;
        let u = seed_user(&pool, "ana").await;
        let svc = ReservationService::new(pool.clone());

        let err = svc.create(booking(&t1, u.id, 5)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PartySizeExceedsCapacity);
        assert!(table_available(&pool, t1.id).await);

        assert!(svc.create(booking(&t2, u.id, 4)).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_references_are_typed_not_found() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let table = seed_table(&pool, r.id, 4).await;
        let other = seed_restaurant(&pool, "Osteria").await;
        let u = seed_user(&pool, "ana").await;
        let svc = ReservationService::new(pool.clone());

        let mut data = booking(&table, 999, 2);
        assert_eq!(svc.create(data.clone()).await.unwrap_err().code, ErrorCode::UserNotFound);

        data.user_id = u.id;
        data.table_id = 999;
        assert_eq!(svc.create(data.clone()).await.unwrap_err().code, ErrorCode::TableNotFound);

        data.table_id = table.id;
        data.restaurant_id = other.id;
        assert_eq!(
            svc.create(data).await.unwrap_err().code,
            ErrorCode::TableRestaurantMismatch
        );

        assert_eq!(svc.get(42).await.unwrap_err().code, ErrorCode::ReservationNotFound);
        assert!(svc.list_by_user(u.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_removes_orders_and_frees_table() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let table = seed_table(&pool, r.id, 4).await;
        let u = seed_user(&pool, "ana").await;
        let item = seed_menu_item(&pool, r.id, 9.5).await;
        let svc = ReservationService::new(pool.clone());

        let res = svc.create(booking(&table, u.id, 2)).await.unwrap();
        for _ in 0..2 {
            let o = order::create(
                &pool,
                &OrderCreate {
                    user_id: u.id,
                    restaurant_id: r.id,
                    table_id: table.id,
                    reservation_id: res.id,
                },
                0,
            )
            .await
            .unwrap();
            order::insert_item(&pool, o.id, item.id, 2).await.unwrap();
        }

        svc.cancel(res.id).await.unwrap();

        assert!(order::find_by_reservation(&pool, res.id).await.unwrap().is_empty());
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(items, 0);
        assert!(table_available(&pool, table.id).await);
        assert_eq!(svc.cancel(res.id).await.unwrap_err().code, ErrorCode::ReservationNotFound);
    }

    #[tokio::test]
    async fn test_update_moves_table_and_orders() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let t1 = seed_table(&pool, r.id, 4).await;
        let t2 = seed_table(&pool, r.id, 6).await;
        let u = seed_user(&pool, "ana").await;
        let svc = ReservationService::new(pool.clone());

        let res = svc.create(booking(&t1, u.id, 2)).await.unwrap();
        let o = order::create(
            &pool,
            &OrderCreate {
                user_id: u.id,
                restaurant_id: r.id,
                table_id: t1.id,
                reservation_id: res.id,
            },
            0,
        )
        .await
        .unwrap();

        let mut body = booking(&t2, u.id, 6);
        body.start_time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let updated = svc.update(res.id, body).await.unwrap();

        assert_eq!(updated.table_id, t2.id);
        assert_eq!(updated.party_size, 6);
        assert!(table_available(&pool, t1.id).await);
        assert!(!table_available(&pool, t2.id).await);
        let moved = order::find_by_id(&pool, o.id).await.unwrap().unwrap();
        assert_eq!(moved.table_id, t2.id);
    }

    #[tokio::test]
    async fn test_update_onto_reserved_table_conflicts() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let t1 = seed_table(&pool, r.id, 4).await;
        let t2 = seed_table(&pool, r.id, 4).await;
        let ana = seed_user(&pool, "ana").await;
        let bob = seed_user(&pool, "bob").await;
        let svc = ReservationService::new(pool.clone());

        let mine = svc.create(booking(&t1, ana.id, 2)).await.unwrap();
        svc.create(booking(&t2, bob.id, 2)).await.unwrap();

        let err = svc.update(mine.id, booking(&t2, ana.id, 2)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableAlreadyReserved);
        assert!(!table_available(&pool, t1.id).await);
        assert_eq!(svc.get(mine.id).await.unwrap().table_id, t1.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_cancels_on_distinct_tables() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let u = seed_user(&pool, "ana").await;
        let svc = ReservationService::new(pool.clone());

        let mut tables = Vec::new();
        let mut reservations = Vec::new();
        for _ in 0..12 {
            let table = seed_table(&pool, r.id, 4).await;
            reservations.push(svc.create(booking(&table, u.id, 2)).await.unwrap());
            tables.push(table);
        }

        let handles: Vec<_> = reservations
            .iter()
            .map(|res| {
                let svc = svc.clone();
                let id = res.id;
                tokio::spawn(async move { svc.cancel(id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(svc.list_all().await.unwrap().is_empty());
        for table in &tables {
            assert!(table_available(&pool, table.id).await);
        }
    }
}
