use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, MovieService, ReviewService, SeaOrmAuthService, SeaOrmMovieService,
    SeaOrmReviewService, TokenService,
};

/// Everything a request handler needs, built once at startup and never mutated.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub movie_service: Arc<dyn MovieService>,

    pub review_service: Arc<dyn ReviewService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Builds the services on top of an already connected store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let secret = config
            .security
            .resolved_token_secret()
            .context("Token signing key is not configured")?;
        let tokens = TokenService::new(&secret, config.security.token_ttl_hours)
            .context("Failed to initialize token service")?;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            tokens,
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        let movie_service = Arc::new(SeaOrmMovieService::new(store.clone()))
            as Arc<dyn MovieService + Send + Sync + 'static>;

        let review_service = Arc::new(SeaOrmReviewService::new(store.clone()))
            as Arc<dyn ReviewService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            auth_service,
            movie_service,
            review_service,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
