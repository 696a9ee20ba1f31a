use crate::entities::{NewReview, Review};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepositoryTrait: Send + Sync {
    async fn insert(&self, review: NewReview) -> Result<Review>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct ReviewRepository {
    pool: Pool<Postgres>,
}

impl ReviewRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepositoryTrait for ReviewRepository {
    async fn insert(&self, review: NewReview) -> Result<Review> {
        let stored = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, professor_id, rating, text, submitter_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, professor_id, rating, text, submitter_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(review.professor_id)
        .bind(review.rating)
        .bind(&review.text)
        .bind(&review.submitter_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
