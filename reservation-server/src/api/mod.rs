//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`account`] - 注册、登录、账户管理
//! - [`restaurants`] - 餐厅管理接口
//! - [`tables`] - 桌台管理接口
//! - [`menu_items`] - 菜品管理接口
//! - [`reservations`] - 订座接口
//! - [`orders`] - 订单接口
//! - [`reviews`] - 评价接口
//! - [`waitlists`] - 候位接口

pub mod account;
pub mod health;

// Data models API
pub mod menu_items;
pub mod orders;
pub mod reservations;
pub mod restaurants;
pub mod reviews;
pub mod tables;
pub mod waitlists;

// Re-export common types for handlers
pub use crate::utils::AppResult;
