//! 服务层 - 预订、订单、评分与级联删除
//!
//! # 服务列表
//!
//! - [`availability`] - 桌台可用状态 (与预订同步)
//! - [`ReservationService`] - 预订生命周期
//! - [`OrderService`] - 订单与订单明细
//! - [`rating`] - 餐厅平均评分重算
//! - [`ReviewService`] - 评价
//! - [`cascade`] - 用户级联删除
//! - [`AccountService`] - 注册、登录、密码
//! - [`RestaurantService`] / [`TableService`] / [`MenuItemService`] - 基础数据
//! - [`WaitlistService`] - 候位
//!
//! 所有多步写操作都在单个 sqlx 事务中完成；事务被 drop 时自动回滚。

pub mod account;
pub mod availability;
pub mod cascade;
pub mod catalog;
pub mod order;
pub mod rating;
pub mod reservation;
pub mod review;
pub mod waitlist;

pub use account::AccountService;
pub use catalog::{MenuItemService, RestaurantService, TableService};
pub use order::OrderService;
pub use reservation::ReservationService;
pub use review::ReviewService;
pub use waitlist::WaitlistService;

use crate::utils::{AppError, AppResult, ErrorCode};

/// Turn a missing row into the entity's typed not-found error
pub(crate) fn require<T>(found: Option<T>, code: ErrorCode, id: i64) -> AppResult<T> {
    found.ok_or_else(|| AppError::entity_not_found(code, id))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Seed helpers shared by the service tests

    use chrono::{Duration, Local, NaiveDate, NaiveTime};
    use shared::models::{
        DiningTable, DiningTableCreate, MenuItem, MenuItemCreate, RegisterRequest, Restaurant,
        RestaurantCreate, Role, TableReservationCreate, User,
    };
    use sqlx::SqlitePool;

    use crate::db::DbService;
    use crate::db::repository::{dining_table, menu_item, restaurant, user};

    pub async fn test_pool() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        (dir, db.pool)
    }

    pub async fn seed_restaurant(pool: &SqlitePool, name: &str) -> Restaurant {
        restaurant::create(
            pool,
            &RestaurantCreate {
                name: name.to_string(),
                location: "Main Street 1".to_string(),
                description: None,
                contact_info: None,
            },
        )
        .await
        .unwrap()
    }

    pub async fn seed_table(pool: &SqlitePool, restaurant_id: i64, capacity: i32) -> DiningTable {
        dining_table::create(
            pool,
            &DiningTableCreate {
                restaurant_id,
                seating_capacity: capacity,
            },
        )
        .await
        .unwrap()
    }

    pub async fn seed_user(pool: &SqlitePool, username: &str) -> User {
        let req = RegisterRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: "unused-password".to_string(),
        };
        user::create(pool, &req, "not-a-real-hash", Role::User, 0)
            .await
            .unwrap()
    }

    pub async fn seed_menu_item(pool: &SqlitePool, restaurant_id: i64, price: f64) -> MenuItem {
        let data = MenuItemCreate {
            restaurant_id,
            name: "Margherita".to_string(),
            description: None,
            price,
        };
        menu_item::create(pool, &data, price).await.unwrap()
    }

    pub fn tomorrow() -> NaiveDate {
        Local::now().date_naive() + Duration::days(1)
    }

    pub fn booking(table: &DiningTable, user_id: i64, party_size: i32) -> TableReservationCreate {
        TableReservationCreate {
            table_id: table.id,
            user_id,
            restaurant_id: table.restaurant_id,
            reservation_date: tomorrow(),
            start_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            party_size,
            special_requests: None,
        }
    }
}
