//! Data models
//!
//! Shared between the server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY). JSON bodies are camelCase.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod reservation;
pub mod restaurant;
pub mod review;
pub mod user;
pub mod waitlist;

// Re-exports
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use reservation::*;
pub use restaurant::*;
pub use review::*;
pub use user::*;
pub use waitlist::*;
