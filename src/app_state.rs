use crate::{
    moderation::Moderator,
    repositories::{ReviewRepository, ReviewRepositoryTrait},
};
use sqlx::{Pool, Postgres};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub moderator: Arc<Moderator>,
    pub review_repo: Arc<dyn ReviewRepositoryTrait>,
}

impl AppState {
    pub fn new(pool: Pool<Postgres>, moderator: Moderator) -> Self {
        Self {
            moderator: Arc::new(moderator),
            review_repo: Arc::new(ReviewRepository::new(pool)),
        }
    }
}
