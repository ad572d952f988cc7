//! `SeaORM` implementation of the `ReviewService` trait.

use crate::db::Store;
use crate::domain::{ReviewId, UserId};
use crate::models::review::{ReviewDraft, ReviewRow};
use crate::services::review_service::{ReviewError, ReviewService, validate_review};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmReviewService {
    store: Store,
}

impl SeaOrmReviewService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReviewService for SeaOrmReviewService {
    async fn create_review(
        &self,
        author: UserId,
        draft: ReviewDraft,
    ) -> Result<ReviewId, ReviewError> {
        let draft = validate_review(draft)?;

        let id = self.store.create_review(author, &draft).await?;
        info!(review_id = %id, movie_id = %draft.movie_id, user_id = %author, "Review created");
        Ok(id)
    }

    async fn list_reviews(&self) -> Result<Vec<ReviewRow>, ReviewError> {
        Ok(self.store.list_reviews().await?)
    }

    async fn get_review(&self, id: ReviewId) -> Result<ReviewRow, ReviewError> {
        self.store
            .get_review(id)
            .await?
            .ok_or(ReviewError::NotFound(id))
    }
}
