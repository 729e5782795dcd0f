//! 基础数据服务 - 餐厅、桌台、菜品
//!
//! 删除时先检查引用，避免留下悬空外键。

use shared::models::{
    DiningTable, DiningTableCreate, DiningTableDetail, DiningTableUpdate, MenuItem, MenuItemCreate,
    MenuItemUpdate, Restaurant, RestaurantCreate, RestaurantDetail, RestaurantUpdate,
};
use sqlx::SqlitePool;

use super::{availability, require};
use crate::db::begin_write;
use crate::db::repository::{
    RepoError, dining_table, menu_item, reservation, restaurant, review, waitlist,
};
use crate::utils::money;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 单桌最大座位数
const MAX_SEATING_CAPACITY: i32 = 100;

// =============================================================================
// Restaurants
// =============================================================================

#[derive(Clone, Debug)]
pub struct RestaurantService {
    pool: SqlitePool,
}

impl RestaurantService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Restaurant>> {
        Ok(restaurant::find_all(&self.pool).await?)
    }

    /// 餐厅及其桌台
    pub async fn get(&self, id: i64) -> AppResult<RestaurantDetail> {
        let found = require(
            restaurant::find_by_id(&self.pool, id).await?,
            ErrorCode::RestaurantNotFound,
            id,
        )?;
        let tables = dining_table::find_by_restaurant(&self.pool, id).await?;
        Ok(RestaurantDetail {
            restaurant: found,
            tables,
        })
    }

    pub async fn create(&self, data: RestaurantCreate) -> AppResult<Restaurant> {
        validate_restaurant(&data)?;
        let created = restaurant::create(&self.pool, &data).await?;
        tracing::info!(restaurant_id = created.id, name = %created.name, "Restaurant created");
        Ok(created)
    }

    /// 全量更新；average_rating 不可由客户端修改
    pub async fn update(&self, id: i64, data: RestaurantUpdate) -> AppResult<Restaurant> {
        validate_restaurant(&data)?;
        require(
            restaurant::update(&self.pool, id, &data).await?,
            ErrorCode::RestaurantNotFound,
            id,
        )
    }

    /// 存在预订或订单时拒绝删除；否则连同评价、候位、菜品、桌台一起删除
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        require(
            restaurant::find_by_id(&mut *tx, id).await?,
            ErrorCode::RestaurantNotFound,
            id,
        )?;
        if restaurant::has_bookings(&mut *tx, id).await? {
            return Err(AppError::new(ErrorCode::RestaurantInUse).with_detail("restaurant_id", id));
        }

        let reviews = review::delete_by_restaurant(&mut *tx, id).await?;
        let waitlists = waitlist::delete_by_restaurant(&mut *tx, id).await?;
        let menu_items = menu_item::delete_by_restaurant(&mut *tx, id).await?;
        let tables = dining_table::delete_by_restaurant(&mut *tx, id).await?;
        restaurant::delete(&mut *tx, id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            restaurant_id = id,
            reviews,
            waitlists,
            menu_items,
            tables,
            "Restaurant deleted"
        );
        Ok(())
    }
}

fn validate_restaurant(data: &RestaurantCreate) -> AppResult<()> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&data.location, "location", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&data.contact_info, "contactInfo", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

// =============================================================================
// Dining tables
// =============================================================================

#[derive(Clone, Debug)]
pub struct TableService {
    pool: SqlitePool,
}

impl TableService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<DiningTable>> {
        Ok(dining_table::find_all(&self.pool).await?)
    }

    pub async fn list_by_restaurant(&self, restaurant_id: i64) -> AppResult<Vec<DiningTable>> {
        Ok(dining_table::find_by_restaurant(&self.pool, restaurant_id).await?)
    }

    /// 桌台及其预订
    pub async fn get(&self, id: i64) -> AppResult<DiningTableDetail> {
        let table = require(
            dining_table::find_by_id(&self.pool, id).await?,
            ErrorCode::TableNotFound,
            id,
        )?;
        let reservations = reservation::find_by_table(&self.pool, id).await?;
        Ok(DiningTableDetail {
            table,
            reservations,
        })
    }

    /// 新桌台默认可用
    pub async fn create(&self, data: DiningTableCreate) -> AppResult<DiningTable> {
        validate_capacity(data.seating_capacity)?;

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        require(
            restaurant::find_by_id(&mut *tx, data.restaurant_id).await?,
            ErrorCode::RestaurantNotFound,
            data.restaurant_id,
        )?;
        let created = dining_table::create(&mut *tx, &data).await?;
        tx.commit().await.map_err(RepoError::from)?;
        tracing::info!(
            table_id = created.id,
            restaurant_id = created.restaurant_id,
            seating_capacity = created.seating_capacity,
            "Table created"
        );
        Ok(created)
    }

    /// 更新座位数
    ///
    /// `is_available` 只能与当前预订状态一致，不能手动改写。
    pub async fn update(&self, id: i64, data: DiningTableUpdate) -> AppResult<DiningTable> {
        validate_capacity(data.seating_capacity)?;

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        require(
            dining_table::find_by_id(&mut *tx, id).await?,
            ErrorCode::TableNotFound,
            id,
        )?;

        if let Some(requested) = data.is_available {
            let derived = !availability::is_occupied(&mut tx, id).await?;
            if requested != derived {
                return Err(AppError::with_message(
                    ErrorCode::TableAvailabilityMismatch,
                    format!("Table availability is derived from reservations (currently {derived})"),
                )
                .with_detail("table_id", id));
            }
        }

        // 座位数不能低于现有预订的人数
        let bookings = reservation::find_by_table(&mut *tx, id).await?;
        if let Some(largest) = bookings
            .iter()
            .filter(|b| b.party_size > data.seating_capacity)
            .max_by_key(|b| b.party_size)
        {
            return Err(AppError::with_message(
                ErrorCode::PartySizeExceedsCapacity,
                format!(
                    "Reservation {} has a party of {}, above the requested capacity {}",
                    largest.id, largest.party_size, data.seating_capacity
                ),
            )
            .with_detail("reservation_id", largest.id)
            .with_detail("party_size", largest.party_size));
        }

        let updated = require(
            dining_table::update_capacity(&mut *tx, id, data.seating_capacity).await?,
            ErrorCode::TableNotFound,
            id,
        )?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(table_id = id, seating_capacity = updated.seating_capacity, "Table updated");
        Ok(updated)
    }

    /// 被预订或订单引用时拒绝删除
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        require(
            dining_table::find_by_id(&mut *tx, id).await?,
            ErrorCode::TableNotFound,
            id,
        )?;
        if dining_table::is_referenced(&mut *tx, id).await? {
            return Err(AppError::new(ErrorCode::TableInUse).with_detail("table_id", id));
        }
        let waitlists = waitlist::delete_by_table(&mut *tx, id).await?;
        dining_table::delete(&mut *tx, id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(table_id = id, waitlists, "Table deleted");
        Ok(())
    }
}

fn validate_capacity(capacity: i32) -> AppResult<()> {
    if !(1..=MAX_SEATING_CAPACITY).contains(&capacity) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Seating capacity must be between 1 and {MAX_SEATING_CAPACITY}, got {capacity}"),
        )
        .with_detail("field", "seatingCapacity"));
    }
    Ok(())
}

// =============================================================================
// Menu items
// =============================================================================

#[derive(Clone, Debug)]
pub struct MenuItemService {
    pool: SqlitePool,
}

impl MenuItemService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<MenuItem>> {
        Ok(menu_item::find_all(&self.pool).await?)
    }

    pub async fn list_by_restaurant(&self, restaurant_id: i64) -> AppResult<Vec<MenuItem>> {
        Ok(menu_item::find_by_restaurant(&self.pool, restaurant_id).await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<MenuItem> {
        require(
            menu_item::find_by_id(&self.pool, id).await?,
            ErrorCode::MenuItemNotFound,
            id,
        )
    }

    pub async fn create(&self, data: MenuItemCreate) -> AppResult<MenuItem> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        let price = money::normalize_price(data.price)?;

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        require(
            restaurant::find_by_id(&mut *tx, data.restaurant_id).await?,
            ErrorCode::RestaurantNotFound,
            data.restaurant_id,
        )?;
        let created = menu_item::create(&mut *tx, &data, price).await?;
        tx.commit().await.map_err(RepoError::from)?;
        tracing::info!(menu_item_id = created.id, restaurant_id = created.restaurant_id, "Menu item created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, data: MenuItemUpdate) -> AppResult<MenuItem> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        let price = money::normalize_price(data.price)?;
        require(
            menu_item::update(&self.pool, id, &data, price).await?,
            ErrorCode::MenuItemNotFound,
            id,
        )
    }

    /// 被订单明细引用时拒绝删除
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        require(
            menu_item::find_by_id(&mut *tx, id).await?,
            ErrorCode::MenuItemNotFound,
            id,
        )?;
        if menu_item::is_referenced(&mut *tx, id).await? {
            return Err(AppError::new(ErrorCode::MenuItemInUse).with_detail("menu_item_id", id));
        }
        menu_item::delete(&mut *tx, id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(menu_item_id = id, "Menu item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::*;
    use crate::services::{OrderService, ReservationService};
    use shared::models::{OrderCreate, OrderItemCreate};

    #[tokio::test]
    async fn test_table_update_rejects_desynchronised_flag() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let table = seed_table(&pool, r.id, 4).await;
        let u = seed_user(&pool, "ana").await;
        let svc = TableService::new(pool.clone());

        let updated = svc
            .update(
                table.id,
                DiningTableUpdate {
                    seating_capacity: 6,
                    is_available: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.seating_capacity, 6);

        ReservationService::new(pool.clone())
            .create(booking(&table, u.id, 2))
            .await
            .unwrap();

        let err = svc
            .update(
                table.id,
                DiningTableUpdate {
                    seating_capacity: 6,
                    is_available: Some(true),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableAvailabilityMismatch);

        // Omitting the flag only changes capacity
        let updated = svc
            .update(
                table.id,
                DiningTableUpdate {
                    seating_capacity: 8,
                    is_available: None,
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_available);
        assert_eq!(updated.seating_capacity, 8);
    }

    #[tokio::test]
    async fn test_table_delete_rules() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let busy = seed_table(&pool, r.id, 4).await;
        let idle = seed_table(&pool, r.id, 4).await;
        let u = seed_user(&pool, "ana").await;
        let svc = TableService::new(pool.clone());

        ReservationService::new(pool.clone())
            .create(booking(&busy, u.id, 2))
            .await
            .unwrap();

        assert_eq!(svc.delete(busy.id).await.unwrap_err().code, ErrorCode::TableInUse);
        svc.delete(idle.id).await.unwrap();
        assert_eq!(svc.get(idle.id).await.unwrap_err().code, ErrorCode::TableNotFound);
    }

    #[tokio::test]
    async fn test_restaurant_delete_rules() {
        let (_dir, pool) = test_pool().await;
        let busy = seed_restaurant(&pool, "Trattoria").await;
        let idle = seed_restaurant(&pool, "Osteria").await;
        let busy_table = seed_table(&pool, busy.id, 4).await;
        seed_table(&pool, idle.id, 2).await;
        seed_menu_item(&pool, idle.id, 3.5).await;
        let u = seed_user(&pool, "ana").await;
        let svc = RestaurantService::new(pool.clone());

        ReservationService::new(pool.clone())
            .create(booking(&busy_table, u.id, 2))
            .await
            .unwrap();

        assert_eq!(
            svc.delete(busy.id).await.unwrap_err().code,
            ErrorCode::RestaurantInUse
        );

        svc.delete(idle.id).await.unwrap();
        assert_eq!(
            svc.get(idle.id).await.unwrap_err().code,
            ErrorCode::RestaurantNotFound
        );
        assert!(dining_table::find_by_restaurant(&pool, idle.id).await.unwrap().is_empty());
        assert_eq!(svc.get(busy.id).await.unwrap().tables.len(), 1);
    }

    #[tokio::test]
    async fn test_menu_item_in_use() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let table = seed_table(&pool, r.id, 4).await;
        let u = seed_user(&pool, "ana").await;
        let svc = MenuItemService::new(pool.clone());

        let item = svc
            .create(MenuItemCreate {
                restaurant_id: r.id,
                name: "Tiramisu".to_string(),
                description: Some("Coffee and mascarpone".to_string()),
                price: 6.499,
            })
            .await
            .unwrap();
        assert_eq!(item.price, 6.5);

        let b = ReservationService::new(pool.clone())
            .create(booking(&table, u.id, 2))
            .await
            .unwrap();
        let orders = OrderService::new(pool.clone());
        let o = orders
            .create(OrderCreate {
                user_id: u.id,
                restaurant_id: r.id,
                table_id: table.id,
                reservation_id: b.id,
            })
            .await
            .unwrap();
        orders
            .add_item(o.id, OrderItemCreate { menu_item_id: item.id, quantity: 1 })
            .await
            .unwrap();

        assert_eq!(svc.delete(item.id).await.unwrap_err().code, ErrorCode::MenuItemInUse);

        orders.delete(o.id).await.unwrap();
        svc.delete(item.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_validation_before_write() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;

        let err = TableService::new(pool.clone())
            .create(DiningTableCreate {
                restaurant_id: r.id,
                seating_capacity: 0,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        let err = MenuItemService::new(pool.clone())
            .create(MenuItemCreate {
                restaurant_id: r.id,
                name: "Free lunch".to_string(),
                description: None,
                price: -1.0,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPrice);

        let err = RestaurantService::new(pool.clone())
            .create(RestaurantCreate {
                name: " ".to_string(),
                location: "Somewhere".to_string(),
                description: None,
                contact_info: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_capacity_cannot_drop_below_booked_party() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let table = seed_table(&pool, r.id, 6).await;
        let u = seed_user(&pool, "ana").await;
        let svc = TableService::new(pool.clone());

        ReservationService::new(pool.clone())
            .create(booking(&table, u.id, 5))
            .await
            .unwrap();

        let err = svc
            .update(
                table.id,
                DiningTableUpdate {
                    seating_capacity: 4,
                    is_available: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PartySizeExceedsCapacity);

        let stored = dining_table::find_by_id(&pool, table.id).await.unwrap().unwrap();
        assert_eq!(stored.seating_capacity, 6);

        // Exactly the party size is fine
        let updated = svc
            .update(
                table.id,
                DiningTableUpdate {
                    seating_capacity: 5,
                    is_available: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.seating_capacity, 5);
    }
}
