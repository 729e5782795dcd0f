//! Reservation Server - 餐厅订座与点餐服务
//!
//! # 架构概述
//!
//! 核心是订座、桌台和订单之间的一致性：
//!
//! - **可用状态** (`services/availability`): 桌台 `is_available` 始终与订座同步
//! - **订座** (`services/reservation`): 条件更新保证同一桌台不会被重复预订
//! - **订单** (`services/order`): 订单必须与订座的餐厅、桌台一致
//! - **评分** (`services/rating`): 评价变更后在同一事务中重算平均分
//! - **级联删除** (`services/cascade`): 删除用户时按依赖顺序清理关联数据
//!
//! # 模块结构
//!
//! ```text
//! reservation-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、密码哈希
//! ├── services/      # 业务逻辑 (事务边界)
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装与中间件
//! ├── utils/         # 日志、校验、金额
//! └── db/            # SQLite 连接池与仓储
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境
///
/// 加载 `.env`，创建日志目录并初始化日志。生产环境输出 JSON 日志。
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let log_dir = std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty());
    let json = std::env::var("ENVIRONMENT")
        .map(|e| e == "production")
        .unwrap_or(false);

    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }

    init_logger_with_file(Some(&log_level), json, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____                                 __  _
   / __ \___  ________  ______   ______ _/ /_(_)___  ____
  / /_/ / _ \/ ___/ _ \/ ___/ | / / __ `/ __/ / __ \/ __ \
 / _, _/  __(__  )  __/ /   | |/ / /_/ / /_/ / /_/ / / / /
/_/ |_|\___/____/\___/_/    |___/\__,_/\__/_/\____/_/ /_/
    "#
    );
}
