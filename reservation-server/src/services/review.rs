//! Review service
//!
//! Each write recomputes the restaurant's average rating before commit.

use shared::models::{Review, ReviewCreate, ReviewDetail, ReviewUpdate};
use sqlx::SqlitePool;

use super::{rating, require};
use crate::db::begin_write;
use crate::db::repository::{RepoError, restaurant, review, user};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppResult, ErrorCode, money};

#[derive(Clone, Debug)]
pub struct ReviewService {
    pool: SqlitePool,
}

impl ReviewService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<ReviewDetail>> {
        Ok(review::find_all(&self.pool).await?)
    }

    pub async fn list_by_restaurant(&self, restaurant_id: i64) -> AppResult<Vec<ReviewDetail>> {
        Ok(review::find_by_restaurant(&self.pool, restaurant_id).await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<ReviewDetail> {
        require(review::find_detail(&self.pool, id).await?, ErrorCode::ReviewNotFound, id)
    }

    /// Raw row, used for ownership checks
    pub async fn find(&self, id: i64) -> AppResult<Review> {
        require(review::find_by_id(&self.pool, id).await?, ErrorCode::ReviewNotFound, id)
    }

    pub async fn create(&self, data: ReviewCreate) -> AppResult<Review> {
        money::validate_rating(data.rating)?;
        validate_optional_text(&data.comment, "comment", MAX_NOTE_LEN)?;

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        require(
            restaurant::find_by_id(&mut *tx, data.restaurant_id).await?,
            ErrorCode::RestaurantNotFound,
            data.restaurant_id,
        )?;
        require(
            user::find_by_id(&mut *tx, data.user_id).await?,
            ErrorCode::UserNotFound,
            data.user_id,
        )?;

        let created = review::create(&mut *tx, &data, shared::util::now_millis()).await?;
        let average = rating::recompute(&mut tx, data.restaurant_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            review_id = created.id,
            restaurant_id = created.restaurant_id,
            average_rating = average,
            "Review created"
        );
        Ok(created)
    }

    pub async fn update(&self, id: i64, data: ReviewUpdate) -> AppResult<Review> {
        money::validate_rating(data.rating)?;
        validate_optional_text(&data.comment, "comment", MAX_NOTE_LEN)?;

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        let updated = require(
            review::update(&mut *tx, id, data.rating, &data.comment).await?,
            ErrorCode::ReviewNotFound,
            id,
        )?;
        let average = rating::recompute(&mut tx, updated.restaurant_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            review_id = id,
            restaurant_id = updated.restaurant_id,
            average_rating = average,
            "Review updated"
        );
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        let existing = require(review::find_by_id(&mut *tx, id).await?, ErrorCode::ReviewNotFound, id)?;
        review::delete(&mut *tx, id).await?;
        let average = rating::recompute(&mut tx, existing.restaurant_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            review_id = id,
            restaurant_id = existing.restaurant_id,
            average_rating = average,
            "Review deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::*;

    async fn stored_rating(pool: &SqlitePool, restaurant_id: i64) -> f64 {
        restaurant::find_by_id(pool, restaurant_id)
            .await
            .unwrap()
            .unwrap()
            .average_rating
    }

    fn review_of(restaurant_id: i64, user_id: i64, rating: f64) -> ReviewCreate {
        ReviewCreate {
            restaurant_id,
            user_id,
            rating,
            comment: Some("Lovely".to_string()),
        }
    }

    #[tokio::test]
    async fn test_average_tracks_reviews() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let u = seed_user(&pool, "ana").await;
        let svc = ReviewService::new(pool.clone());

        let four = svc.create(review_of(r.id, u.id, 4.0)).await.unwrap();
        let five = svc.create(review_of(r.id, u.id, 5.0)).await.unwrap();
        assert_eq!(stored_rating(&pool, r.id).await, 4.5);

        svc.delete(four.id).await.unwrap();
        assert_eq!(stored_rating(&pool, r.id).await, 5.0);

        svc.delete(five.id).await.unwrap();
        assert_eq!(stored_rating(&pool, r.id).await, 0.0);
    }

    #[tokio::test]
    async fn test_update_recomputes_and_rounds() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let u = seed_user(&pool, "ana").await;
        let svc = ReviewService::new(pool.clone());

        svc.create(review_of(r.id, u.id, 4.0)).await.unwrap();
        svc.create(review_of(r.id, u.id, 4.0)).await.unwrap();
        let third = svc.create(review_of(r.id, u.id, 4.0)).await.unwrap();

        svc.update(
            third.id,
            ReviewUpdate {
                rating: 5.0,
                comment: None,
            },
        )
        .await
        .unwrap();
        // (4 + 4 + 5) / 3 = 4.333…
        assert_eq!(stored_rating(&pool, r.id).await, 4.3);

        let detail = svc.get(third.id).await.unwrap();
        assert_eq!(detail.username, "ana");
        assert_eq!(detail.restaurant_name, "Trattoria");
        assert_eq!(detail.comment, None);
    }

    #[tokio::test]
    async fn test_invalid_rating_leaves_average() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let u = seed_user(&pool, "ana").await;
        let svc = ReviewService::new(pool.clone());

        svc.create(review_of(r.id, u.id, 3.0)).await.unwrap();
        let err = svc.create(review_of(r.id, u.id, 6.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRating);
        assert_eq!(stored_rating(&pool, r.id).await, 3.0);

        let err = svc.create(review_of(999, u.id, 3.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RestaurantNotFound);
        assert_eq!(svc.delete(999).await.unwrap_err().code, ErrorCode::ReviewNotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_all_commit() {
        let (_dir, pool) = test_pool().await;
        let r = seed_restaurant(&pool, "Trattoria").await;
        let u = seed_user(&pool, "ana").await;
        let svc = ReviewService::new(pool.clone());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let svc = svc.clone();
                let rating = if i % 2 == 0 { 4.0 } else { 5.0 };
                tokio::spawn(async move { svc.create(review_of(r.id, u.id, rating)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(svc.list_by_restaurant(r.id).await.unwrap().len(), 16);
        assert_eq!(stored_rating(&pool, r.id).await, 4.5);
    }
}
