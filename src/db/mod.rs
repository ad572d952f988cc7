use crate::config::SecurityConfig;
use crate::domain::{MovieId, ReviewId, UserId};
use crate::models::movie::{MovieDetail, MovieDraft, MovieSummary};
use crate::models::review::{ReviewDraft, ReviewRow};
use crate::models::seed::SeedData;
use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::movies;
use crate::services::{AuthError, MovieError, ReviewError};

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

/// True when the database rejected a write because of a unique index.
///
/// This is the check-and-set primitive for usernames: the loser of a race sees
/// this error instead of a silent duplicate.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Current time in the RFC 3339 format used by every timestamp column.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        // WAL persists in the file, so one connection switching it covers the pool.
        if !db_url.contains(":memory:") {
            conn.execute_unprepared("PRAGMA journal_mode=WAL").await?;
        }

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    // ========== Repositories ==========

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    fn reference_repo(&self) -> repositories::reference::ReferenceRepository {
        repositories::reference::ReferenceRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User, AuthError> {
        self.user_repo().create(username, password, security).await
    }

    pub async fn verify_user_password(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .verify_password(username, password, security)
            .await
    }

    // ========== Movies ==========

    pub async fn create_movie(&self, draft: &MovieDraft) -> Result<movies::Model, MovieError> {
        self.movie_repo().create(draft).await
    }

    pub async fn list_movies(&self) -> Result<Vec<MovieSummary>> {
        self.movie_repo().list_with_ratings().await
    }

    pub async fn get_movie_detail(&self, id: MovieId) -> Result<Option<MovieDetail>> {
        self.movie_repo().get_detail(id).await
    }

    pub async fn movie_count(&self) -> Result<u64> {
        self.movie_repo().count().await
    }

    // ========== Reviews ==========

    pub async fn create_review(
        &self,
        user_id: UserId,
        draft: &ReviewDraft,
    ) -> Result<ReviewId, ReviewError> {
        self.review_repo().create(user_id, draft).await
    }

    pub async fn mean_rating(&self, movie_id: MovieId) -> Result<f64> {
        self.review_repo().mean_rating(movie_id).await
    }

    pub async fn list_reviews(&self) -> Result<Vec<ReviewRow>> {
        self.review_repo().list().await
    }

    pub async fn get_review(&self, id: ReviewId) -> Result<Option<ReviewRow>> {
        self.review_repo().get(id).await
    }

    pub async fn review_count(&self) -> Result<u64> {
        self.review_repo().count().await
    }

    // ========== Reference data ==========

    pub async fn apply_seed(
        &self,
        seed: &SeedData,
    ) -> Result<repositories::reference::SeedReport> {
        self.reference_repo().apply_seed(seed).await
    }
}
