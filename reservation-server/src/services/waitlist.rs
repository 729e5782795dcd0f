//! 候位服务
//!
//! 候位不影响桌台可用状态。

use shared::models::{Waitlist, WaitlistCreate};
use sqlx::SqlitePool;

use super::require;
use crate::db::begin_write;
use crate::db::repository::{RepoError, dining_table, restaurant, user, waitlist};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone, Debug)]
pub struct WaitlistService {
    pool: SqlitePool,
}

impl WaitlistService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Waitlist>> {
        Ok(waitlist::find_all(&self.pool).await?)
    }

    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Waitlist>> {
        Ok(waitlist::find_by_user(&self.pool, user_id).await?)
    }

    pub async fn list_by_table(&self, table_id: i64) -> AppResult<Vec<Waitlist>> {
        Ok(waitlist::find_by_table(&self.pool, table_id).await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<Waitlist> {
        require(waitlist::find_by_id(&self.pool, id).await?, ErrorCode::WaitlistNotFound, id)
    }

    pub async fn create(&self, data: WaitlistCreate) -> AppResult<Waitlist> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
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
        require(
            user::find_by_id(&mut *tx, data.user_id).await?,
            ErrorCode::UserNotFound,
            data.user_id,
        )?;
        if table.restaurant_id != data.restaurant_id {
            return Err(AppError::new(ErrorCode::TableRestaurantMismatch)
                .with_detail("table_id", table.id)
                .with_detail("restaurant_id", data.restaurant_id));
        }

        let created = waitlist::create(&mut *tx, &data, shared::util::now_millis()).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            waitlist_id = created.id,
            table_id = created.table_id,
            user_id = created.user_id,
            "Waitlist entry created"
        );
        Ok(created)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !waitlist::delete(&self.pool, id).await? {
            return Err(AppError::entity_not_found(ErrorCode::WaitlistNotFound, id));
        }
        tracing::info!(waitlist_id = id, "Waitlist entry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::*;

    #[tokio::test]
    async fn test_waitlist_lifecycle() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let other = seed_restaurant(&pool, "Osteria").await;
        let table = seed_table(&pool, r.id, 4).await;
        let u = seed_user(&pool, "ana").await;
        let svc = WaitlistService::new(pool.clone());

        let entry = svc
            .create(WaitlistCreate {
                restaurant_id: r.id,
                table_id: table.id,
                user_id: u.id,
            })
            .await
            .unwrap();
        assert_eq!(svc.list_by_user(u.id).await.unwrap(), vec![entry.clone()]);
        assert_eq!(svc.list_by_table(table.id).await.unwrap(), vec![entry.clone()]);

        // No availability side effect
        let stored = dining_table::find_by_id(&pool, table.id).await.unwrap().unwrap();
        assert!(stored.is_available);

        let err = svc
            .create(WaitlistCreate {
                restaurant_id: other.id,
                table_id: table.id,
                user_id: u.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableRestaurantMismatch);

        svc.delete(entry.id).await.unwrap();
        assert_eq!(svc.get(entry.id).await.unwrap_err().code, ErrorCode::WaitlistNotFound);
        assert_eq!(svc.delete(entry.id).await.unwrap_err().code, ErrorCode::WaitlistNotFound);
    }
}
