use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::store::{
    postgres::{PgCredentialStore, PgRecipeStore},
    CredentialStore, RecipeStore,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CredentialStore>,
    pub recipes: Arc<dyn RecipeStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Read the environment, connect to Postgres and wire the production
    /// stores. Pending migrations run here.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::warn!(error = %e, "migration failed; continuing with the current schema");
        }

        Ok(Self {
            users: Arc::new(PgCredentialStore::new(pool.clone())),
            recipes: Arc::new(PgRecipeStore::new(pool)),
            config,
        })
    }

    /// Assemble a state from explicit parts. Tests pass the in-memory
    /// store here.
    pub fn from_parts(
        users: Arc<dyn CredentialStore>,
        recipes: Arc<dyn RecipeStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            recipes,
            config,
        }
    }
}
