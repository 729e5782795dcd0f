//! Order lifecycle
//!
//! Orders hang off a reservation. Every item mutation recomputes
//! `total_amount` from the current menu prices in the same transaction.

use shared::models::{
    Order, OrderCreate, OrderDetail, OrderItemCreate, OrderItemUpdate, OrderStatus,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::require;
use crate::db::begin_write;
use crate::db::repository::{RepoError, dining_table, menu_item, order, reservation, restaurant, user};
use crate::utils::money;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Order service
#[derive(Clone, Debug)]
pub struct OrderService {
    pool: SqlitePool,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Order>> {
        Ok(order::find_all(&self.pool).await?)
    }

    pub async fn list_by_table(&self, table_id: i64) -> AppResult<Vec<Order>> {
        Ok(order::find_by_table(&self.pool, table_id).await?)
    }

    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Order>> {
        Ok(order::find_by_user(&self.pool, user_id).await?)
    }

    pub async fn list_by_reservation(&self, reservation_id: i64) -> AppResult<Vec<Order>> {
        Ok(order::find_by_reservation(&self.pool, reservation_id).await?)
    }

    /// Order with its lines
    pub async fn get(&self, id: i64) -> AppResult<OrderDetail> {
        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        load_detail(&mut conn, id).await
    }

    /// Open a `pending` order with a zero total
    ///
    /// Reference checks and the insert share one write transaction, so a
    /// reservation cancelled concurrently surfaces as `ReservationNotFound`.
    pub async fn create(&self, data: OrderCreate) -> AppResult<Order> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        require(
            user::find_by_id(&mut *tx, data.user_id).await?,
            ErrorCode::UserNotFound,
            data.user_id,
        )?;
        require(
            restaurant::find_by_id(&mut *tx, data.restaurant_id).await?,
            ErrorCode::RestaurantNotFound,
            data.restaurant_id,
        )?;
        let table = require(
            dining_table::find_by_id(&mut *tx, data.table_id).await?,
            ErrorCode::TableNotFound,
            data.table_id,
        )?;
        let booking = require(
            reservation::find_by_id(&mut *tx, data.reservation_id).await?,
            ErrorCode::ReservationNotFound,
            data.reservation_id,
        )?;

        if table.restaurant_id != data.restaurant_id {
            return Err(AppError::new(ErrorCode::TableRestaurantMismatch)
                .with_detail("table_id", table.id)
                .with_detail("restaurant_id", data.restaurant_id));
        }
        if booking.table_id != data.table_id || booking.restaurant_id != data.restaurant_id {
            return Err(AppError::new(ErrorCode::OrderReservationMismatch)
                .with_detail("reservation_id", booking.id)
                .with_detail("table_id", data.table_id));
        }

        let created = order::create(&mut *tx, &data, shared::util::now_millis()).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id = created.id,
            reservation_id = created.reservation_id,
            table_id = created.table_id,
            "Order created"
        );
        Ok(created)
    }

    pub async fn add_item(&self, order_id: i64, data: OrderItemCreate) -> AppResult<OrderDetail> {
        money::validate_quantity(data.quantity)?;

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        let current = load_open_order(&mut tx, order_id).await?;

        let item = require(
            menu_item::find_by_id(&mut *tx, data.menu_item_id).await?,
            ErrorCode::MenuItemNotFound,
            data.menu_item_id,
        )?;
        if item.restaurant_id != current.restaurant_id {
            return Err(AppError::new(ErrorCode::MenuItemRestaurantMismatch)
                .with_detail("menu_item_id", item.id)
                .with_detail("restaurant_id", current.restaurant_id));
        }

        let item_id = order::insert_item(&mut *tx, order_id, item.id, data.quantity).await?;
        let total = recompute_total(&mut tx, order_id).await?;
        let detail = load_detail(&mut tx, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id, item_id, total_amount = total, "Order item added");
        Ok(detail)
    }

    pub async fn update_item(
        &self,
        order_id: i64,
        item_id: i64,
        data: OrderItemUpdate,
    ) -> AppResult<OrderDetail> {
        money::validate_quantity(data.quantity)?;

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        load_open_order(&mut tx, order_id).await?;

        if !order::update_item_quantity(&mut *tx, order_id, item_id, data.quantity).await? {
            return Err(AppError::entity_not_found(ErrorCode::OrderItemNotFound, item_id));
        }
        let total = recompute_total(&mut tx, order_id).await?;
        let detail = load_detail(&mut tx, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id, item_id, quantity = data.quantity, total_amount = total, "Order item updated");
        Ok(detail)
    }

    pub async fn remove_item(&self, order_id: i64, item_id: i64) -> AppResult<OrderDetail> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        load_open_order(&mut tx, order_id).await?;

        if !order::delete_item(&mut *tx, order_id, item_id).await? {
            return Err(AppError::entity_not_found(ErrorCode::OrderItemNotFound, item_id));
        }
        let total = recompute_total(&mut tx, order_id).await?;
        let detail = load_detail(&mut tx, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id, item_id, total_amount = total, "Order item removed");
        Ok(detail)
    }

    /// Move the order to another status; terminal statuses are final
    pub async fn update_status(&self, order_id: i64, status: &str) -> AppResult<Order> {
        let next: OrderStatus = status.parse()?;

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        let current = require(
            order::find_by_id(&mut *tx, order_id).await?,
            ErrorCode::OrderNotFound,
            order_id,
        )?;
        if !current.order_status.can_transition_to(next) {
            return Err(AppError::with_message(
                ErrorCode::OrderAlreadyClosed,
                format!("Order is {} and cannot become {}", current.order_status, next),
            )
            .with_detail("order_id", order_id));
        }

        let updated = require(
            order::set_status(&mut *tx, order_id, next).await?,
            ErrorCode::OrderNotFound,
            order_id,
        )?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id, from = %current.order_status, to = %next, "Order status changed");
        Ok(updated)
    }

    /// Delete the order's items, then the order
    pub async fn delete(&self, order_id: i64) -> AppResult<()> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        require(
            order::find_by_id(&mut *tx, order_id).await?,
            ErrorCode::OrderNotFound,
            order_id,
        )?;
        let items = order::delete_items(&mut *tx, order_id).await?;
        order::delete(&mut *tx, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id, items_deleted = items, "Order deleted");
        Ok(())
    }
}

async fn load_detail(conn: &mut SqliteConnection, order_id: i64) -> AppResult<OrderDetail> {
    let found = require(
        order::find_by_id(&mut *conn, order_id).await?,
        ErrorCode::OrderNotFound,
        order_id,
    )?;
    let items = order::find_items(&mut *conn, order_id).await?;
    Ok(OrderDetail {
        order: found,
        items,
    })
}

/// Load an order that still accepts item changes
async fn load_open_order(conn: &mut SqliteConnection, order_id: i64) -> AppResult<Order> {
    let found = require(
        order::find_by_id(&mut *conn, order_id).await?,
        ErrorCode::OrderNotFound,
        order_id,
    )?;
    if found.order_status.is_terminal() {
        return Err(AppError::with_message(
            ErrorCode::OrderAlreadyClosed,
            format!("Order is {}", found.order_status),
        )
        .with_detail("order_id", order_id));
    }
    Ok(found)
}

/// total = Σ quantity × current unit price
async fn recompute_total(conn: &mut SqliteConnection, order_id: i64) -> AppResult<f64> {
    let lines = order::price_lines(&mut *conn, order_id).await?;
    let total = money::order_total(&lines);
    order::set_total(&mut *conn, order_id, total).await?;
    Ok(total)
}
