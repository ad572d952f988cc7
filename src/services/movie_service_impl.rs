//! `SeaORM` implementation of the `MovieService` trait.

use crate::db::Store;
use crate::domain::{MovieId, UserId};
use crate::models::movie::{MovieDetail, MovieDraft, MovieSummary};
use crate::services::movie_service::{MovieError, MovieService, validate_draft};
use async_trait::async_trait;
use chrono::Datelike;
use tracing::info;

pub struct SeaOrmMovieService {
    store: Store,
}

impl SeaOrmMovieService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MovieService for SeaOrmMovieService {
    async fn create_movie(
        &self,
        created_by: UserId,
        draft: MovieDraft,
    ) -> Result<MovieDetail, MovieError> {
        validate_draft(&draft, chrono::Utc::now().year())?;

        let movie = self.store.create_movie(&draft).await?;
        let id = MovieId::new(movie.id);
        info!(movie_id = %id, user_id = %created_by, "Movie added to catalog");

        self.store
            .get_movie_detail(id)
            .await?
            .ok_or(MovieError::NotFound(id))
    }

    async fn list_movies(&self) -> Result<Vec<MovieSummary>, MovieError> {
        Ok(self.store.list_movies().await?)
    }

    async fn get_movie(&self, id: MovieId) -> Result<MovieDetail, MovieError> {
        self.store
            .get_movie_detail(id)
            .await?
            .ok_or(MovieError::NotFound(id))
    }
}
