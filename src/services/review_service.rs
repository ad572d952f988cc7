//! Domain service for user reviews.

use thiserror::Error;

use crate::domain::{MovieId, ReviewId, UserId};
use crate::models::review::{ReviewDraft, ReviewRow};

pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 10.0;

/// Errors specific to review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Invalid review: {0}")]
    Invalid(String),

    #[error("Movie not found: {0}")]
    MovieNotFound(MovieId),

    #[error("You have already reviewed movie {0}")]
    Duplicate(MovieId),

    #[error("Review not found: {0}")]
    NotFound(ReviewId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReviewError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReviewError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait ReviewService: Send + Sync {
    /// Stores a review written by `author`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Invalid`] when neither a rating nor text is given,
    /// [`ReviewError::MovieNotFound`] for an unknown movie and
    /// [`ReviewError::Duplicate`] when the author already reviewed it.
    async fn create_review(
        &self,
        author: UserId,
        draft: ReviewDraft,
    ) -> Result<ReviewId, ReviewError>;

    async fn list_reviews(&self) -> Result<Vec<ReviewRow>, ReviewError>;

    async fn get_review(&self, id: ReviewId) -> Result<ReviewRow, ReviewError>;
}

/// Normalizes the draft and enforces "a rating or some text".
pub fn validate_review(draft: ReviewDraft) -> Result<ReviewDraft, ReviewError> {
    let draft = draft.normalized();

    let in_range = |r: f64| r.is_finite() && (RATING_MIN..=RATING_MAX).contains(&r);
    if draft.rating.is_some_and(|r| !in_range(r)) {
        return Err(ReviewError::Invalid(format!(
            "Rating must be between {RATING_MIN} and {RATING_MAX}"
        )));
    }

    if draft.rating.is_none() && draft.text.is_none() {
        return Err(ReviewError::Invalid(
            "A review needs a rating or some text".to_string(),
        ));
    }

    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(rating: Option<f64>, text: Option<&str>) -> ReviewDraft {
        ReviewDraft {
            movie_id: MovieId::new(1),
            rating,
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn empty_review_is_invalid() {
        assert!(matches!(
            validate_review(draft(None, Some(""))),
            Err(ReviewError::Invalid(_))
        ));
        assert!(matches!(
            validate_review(draft(None, Some("  \n "))),
            Err(ReviewError::Invalid(_))
        ));
        assert!(matches!(
            validate_review(draft(None, None)),
            Err(ReviewError::Invalid(_))
        ));
    }

    #[test]
    fn rating_alone_or_text_alone_is_enough() {
        assert!(validate_review(draft(Some(7.5), None)).is_ok());
        let d = validate_review(draft(None, Some(" loved it "))).unwrap();
        assert_eq!(d.text.as_deref(), Some("loved it"));
    }

    #[test]
    fn rating_outside_scale_is_invalid() {
        assert!(validate_review(draft(Some(-0.5), None)).is_err());
        assert!(validate_review(draft(Some(10.5), None)).is_err());
        assert!(validate_review(draft(Some(f64::NAN), Some("text"))).is_err());
        assert!(validate_review(draft(Some(0.0), None)).is_ok());
        assert!(validate_review(draft(Some(10.0), None)).is_ok());
    }
}
