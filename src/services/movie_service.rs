//! Domain service for the movie catalog.
//!
//! Creating a movie writes the movie row and all of its association rows as one
//! aggregate. Reads return the listing (with mean ratings) and the full detail.

use thiserror::Error;

use crate::domain::{MovieId, ReferenceKind, UserId};
use crate::models::movie::{MovieDetail, MovieDraft, MovieSummary};

/// Earliest year accepted for a movie.
pub const FIRST_FILM_YEAR: i32 = 1888;

/// How far into the future a release year may be announced.
pub const MAX_YEARS_AHEAD: i32 = 5;

pub const TITLE_MAX_LEN: usize = 200;
pub const TAGLINE_MAX_LEN: usize = 200;

/// Errors specific to movie operations.
#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown {kind} id {id}")]
    UnresolvedReference { kind: ReferenceKind, id: i32 },

    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for MovieError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for MovieError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Validates and stores a movie with its associations, returning the stored detail.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::Validation`] for a malformed draft and
    /// [`MovieError::UnresolvedReference`] when an association id does not exist.
    /// Nothing is written in either case.
    async fn create_movie(
        &self,
        created_by: UserId,
        draft: MovieDraft,
    ) -> Result<MovieDetail, MovieError>;

    /// Lists all movies with their mean rating.
    async fn list_movies(&self) -> Result<Vec<MovieSummary>, MovieError>;

    /// Gets one movie with all associations.
    async fn get_movie(&self, id: MovieId) -> Result<MovieDetail, MovieError>;
}

/// Field checks that need no database access.
pub fn validate_draft(draft: &MovieDraft, current_year: i32) -> Result<(), MovieError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(MovieError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(MovieError::Validation(format!(
            "Title must be at most {TITLE_MAX_LEN} characters"
        )));
    }

    let latest = current_year + MAX_YEARS_AHEAD;
    if !(FIRST_FILM_YEAR..=latest).contains(&draft.year) {
        return Err(MovieError::Validation(format!(
            "Year must be between {FIRST_FILM_YEAR} and {latest}"
        )));
    }

    if draft.runtime.is_some_and(|r| r <= 0) {
        return Err(MovieError::Validation(
            "Runtime must be a positive number of minutes".to_string(),
        ));
    }

    if draft
        .tagline
        .as_deref()
        .is_some_and(|t| t.chars().count() > TAGLINE_MAX_LEN)
    {
        return Err(MovieError::Validation(format!(
            "Tagline must be at most {TAGLINE_MAX_LEN} characters"
        )));
    }

    if draft.budget.is_some_and(|b| b < 0) {
        return Err(MovieError::Validation("Budget must not be negative".to_string()));
    }
    if draft.gross.is_some_and(|g| g < 0) {
        return Err(MovieError::Validation("Gross must not be negative".to_string()));
    }

    if draft
        .rating
        .is_some_and(|r| !r.is_finite() || !(0.0..=10.0).contains(&r))
    {
        return Err(MovieError::Validation(
            "Critic rating must be between 0 and 10".to_string(),
        ));
    }
    if draft.votes.is_some_and(|v| v < 0) {
        return Err(MovieError::Validation("Votes must not be negative".to_string()));
    }
    if draft.metascore.is_some_and(|m| !(0..=100).contains(&m)) {
        return Err(MovieError::Validation(
            "Metascore must be between 0 and 100".to_string(),
        ));
    }

    if draft.roles.iter().any(|r| r.character.trim().is_empty()) {
        return Err(MovieError::Validation(
            "Every role needs a character name".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::RoleDraft;

    fn draft() -> MovieDraft {
        MovieDraft {
            title: "Inception".to_string(),
            year: 2010,
            ..MovieDraft::default()
        }
    }

    #[test]
    fn minimal_draft_is_valid() {
        assert!(validate_draft(&draft(), 2026).is_ok());
    }

    #[test]
    fn blank_title_is_rejected() {
        let d = MovieDraft {
            title: "   ".to_string(),
            ..draft()
        };
        assert!(matches!(validate_draft(&d, 2026), Err(MovieError::Validation(_))));
    }

    #[test]
    fn year_bounds() {
        let too_early = MovieDraft {
            year: 1887,
            ..draft()
        };
        let earliest = MovieDraft {
            year: 1888,
            ..draft()
        };
        let latest = MovieDraft {
            year: 2031,
            ..draft()
        };
        let too_late = MovieDraft {
            year: 2032,
            ..draft()
        };
        assert!(validate_draft(&too_early, 2026).is_err());
        assert!(validate_draft(&earliest, 2026).is_ok());
        assert!(validate_draft(&latest, 2026).is_ok());
        assert!(validate_draft(&too_late, 2026).is_err());
    }

    #[test]
    fn non_positive_runtime_is_rejected() {
        let d = MovieDraft {
            runtime: Some(0),
            ..draft()
        };
        assert!(validate_draft(&d, 2026).is_err());
    }

    #[test]
    fn negative_money_is_rejected() {
        let d = MovieDraft {
            budget: Some(-1),
            ..draft()
        };
        assert!(validate_draft(&d, 2026).is_err());

        let d = MovieDraft {
            gross: Some(-5),
            ..draft()
        };
        assert!(validate_draft(&d, 2026).is_err());
    }

    #[test]
    fn critic_fields_are_range_checked() {
        let ok = MovieDraft {
            rating: Some(8.8),
            votes: Some(2_400_000),
            metascore: Some(74),
            ..draft()
        };
        assert!(validate_draft(&ok, 2026).is_ok());

        for bad in [
            MovieDraft {
                rating: Some(f64::NAN),
                ..draft()
            },
            MovieDraft {
                rating: Some(10.5),
                ..draft()
            },
            MovieDraft {
                votes: Some(-1),
                ..draft()
            },
            MovieDraft {
                metascore: Some(101),
                ..draft()
            },
        ] {
            assert!(matches!(validate_draft(&bad, 2026), Err(MovieError::Validation(_))));
        }
    }

    #[test]
    fn role_without_character_is_rejected() {
        let d = MovieDraft {
            roles: vec![RoleDraft {
                person_id: 1,
                character: " ".to_string(),
            }],
            ..draft()
        };
        assert!(validate_draft(&d, 2026).is_err());
    }
}
