use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{
    AccountService, MenuItemService, OrderService, ReservationService, RestaurantService,
    ReviewService, TableService, WaitlistService,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是浅拷贝 (连接池和 Arc)，可以放心 clone 到每个请求。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | 数据库连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | accounts | AccountService | 注册、登录、账号删除 |
/// | restaurants / tables / menu_items | 基础数据服务 | 餐厅、桌台、菜品 |
/// | reservations | ReservationService | 预订生命周期 |
/// | orders | OrderService | 订单生命周期 |
/// | reviews | ReviewService | 评价与评分 |
/// | waitlists | WaitlistService | 候位 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    pub accounts: AccountService,
    pub restaurants: RestaurantService,
    pub tables: TableService,
    pub menu_items: MenuItemService,
    pub reservations: ReservationService,
    pub orders: OrderService,
    pub reviews: ReviewService,
    pub waitlists: WaitlistService,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 方法代替
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            accounts: AccountService::new(pool.clone(), jwt_service.clone()),
            restaurants: RestaurantService::new(pool.clone()),
            tables: TableService::new(pool.clone()),
            menu_items: MenuItemService::new(pool.clone()),
            reservations: ReservationService::new(pool.clone()),
            orders: OrderService::new(pool.clone()),
            reviews: ReviewService::new(pool.clone()),
            waitlists: WaitlistService::new(pool.clone()),
            config,
            pool,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建数据库目录
    /// 2. 打开数据库并执行迁移
    /// 3. 创建 JWT 服务 (生产环境要求显式配置 JWT_SECRET)
    /// 4. 创建初始管理员 (如已配置)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir).map_err(|e| {
            AppError::with_message(
                ErrorCode::ConfigError,
                format!("Failed to create database directory {}: {}", db_dir.display(), e),
            )
        })?;

        if config.is_production() && !config.jwt.secret_from_env {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                "JWT_SECRET (at least 32 characters) must be set in production",
            ));
        }

        let db = DbService::with_max_connections(&config.database_path, config.db_max_connections)
            .await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let state = Self::new(config.clone(), db.pool, jwt_service);

        if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
            state.accounts.bootstrap_admin(username, password).await?;
        }

        tracing::info!(
            environment = %config.environment,
            database = %config.database_path,
            "Server state initialized"
        );
        Ok(state)
    }

    /// 获取数据库连接池
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
